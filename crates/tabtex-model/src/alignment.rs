//! Column alignment specifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UsageError};

/// Package required by decimal-aligned columns.
pub const DECIMAL_PACKAGE: &str = "siunitx";

/// Alignment of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// siunitx `S` column aligned on the decimal marker.
    Decimal {
        integer_digits: u8,
        decimal_digits: u8,
    },
}

impl Alignment {
    /// LaTeX column specifier (`l`, `c`, `r`, `S[table-format=I.D]`).
    pub fn column_spec(&self) -> String {
        match self {
            Self::Left => "l".to_string(),
            Self::Center => "c".to_string(),
            Self::Right => "r".to_string(),
            Self::Decimal {
                integer_digits,
                decimal_digits,
            } => format!("S[table-format={integer_digits}.{decimal_digits}]"),
        }
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, Self::Decimal { .. })
    }

    /// Preamble packages this column needs.
    pub fn required_packages(&self) -> &'static [&'static str] {
        if self.is_decimal() {
            &[DECIMAL_PACKAGE]
        } else {
            &[]
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal {
                integer_digits,
                decimal_digits,
            } => write!(f, "d{integer_digits}.{decimal_digits}"),
            other => f.write_str(&other.column_spec()),
        }
    }
}

impl FromStr for Alignment {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || UsageError::InvalidAlignment {
            value: s.to_string(),
        };
        match trimmed.to_ascii_lowercase().as_str() {
            "l" | "left" => return Ok(Self::Left),
            "c" | "center" | "centre" => return Ok(Self::Center),
            "r" | "right" => return Ok(Self::Right),
            _ => {}
        }
        let format = trimmed
            .strip_prefix("S[table-format=")
            .and_then(|rest| rest.strip_suffix(']'))
            .or_else(|| trimmed.strip_prefix('d'))
            .ok_or_else(invalid)?;
        let (integer, decimal) = format.split_once('.').unwrap_or((format, "0"));
        let integer_digits = integer.parse::<u8>().map_err(|_| invalid())?;
        let decimal_digits = decimal.parse::<u8>().map_err(|_| invalid())?;
        Ok(Self::Decimal {
            integer_digits,
            decimal_digits,
        })
    }
}

impl TryFrom<String> for Alignment {
    type Error = UsageError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Alignment> for String {
    fn from(value: Alignment) -> Self {
        value.to_string()
    }
}

/// Resolved alignment, one entry per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentSpec(Vec<Alignment>);

impl AlignmentSpec {
    pub fn new(entries: Vec<Alignment>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[Alignment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<Alignment> {
        self.0.get(column).copied()
    }

    /// Concatenated column specification for the table environment.
    pub fn column_spec(&self) -> String {
        self.0.iter().map(Alignment::column_spec).collect()
    }
}

/// Caller-facing alignment request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AlignmentInput {
    /// Numeric columns right, everything else left.
    #[default]
    Auto,
    /// One alignment broadcast to every column.
    Single(Alignment),
    /// Exactly one alignment per column.
    PerColumn(Vec<Alignment>),
}

impl FromStr for AlignmentInput {
    type Err = UsageError;

    /// Parses `auto`, a single token (`c`), a compact string (`lrc`) or a
    /// comma-separated list (`l, r, d2.1`).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if trimmed.contains(',') {
            let entries = trimmed
                .split(',')
                .map(str::parse)
                .collect::<Result<Vec<Alignment>>>()?;
            return Ok(Self::PerColumn(entries));
        }
        if let Ok(single) = trimmed.parse::<Alignment>() {
            return Ok(Self::Single(single));
        }
        if trimmed.chars().all(|c| matches!(c, 'l' | 'c' | 'r')) {
            let entries = trimmed
                .chars()
                .map(|c| c.to_string().parse())
                .collect::<Result<Vec<Alignment>>>()?;
            return Ok(Self::PerColumn(entries));
        }
        Err(UsageError::InvalidAlignment {
            value: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!("l".parse::<Alignment>().unwrap(), Alignment::Left);
        assert_eq!("Center".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!(" r ".parse::<Alignment>().unwrap(), Alignment::Right);
    }

    #[test]
    fn test_parse_decimal() {
        let expected = Alignment::Decimal {
            integer_digits: 2,
            decimal_digits: 3,
        };
        assert_eq!("d2.3".parse::<Alignment>().unwrap(), expected);
        assert_eq!("S[table-format=2.3]".parse::<Alignment>().unwrap(), expected);
        assert_eq!(expected.column_spec(), "S[table-format=2.3]");
        assert_eq!(expected.required_packages(), &[DECIMAL_PACKAGE]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "x".parse::<Alignment>(),
            Err(UsageError::InvalidAlignment { .. })
        ));
        assert!("dx.1".parse::<Alignment>().is_err());
    }

    #[test]
    fn test_input_forms() {
        assert_eq!("auto".parse::<AlignmentInput>().unwrap(), AlignmentInput::Auto);
        assert_eq!(
            "c".parse::<AlignmentInput>().unwrap(),
            AlignmentInput::Single(Alignment::Center)
        );
        assert_eq!(
            "lrc".parse::<AlignmentInput>().unwrap(),
            AlignmentInput::PerColumn(vec![Alignment::Left, Alignment::Right, Alignment::Center])
        );
        assert_eq!(
            "l, d1.2".parse::<AlignmentInput>().unwrap(),
            AlignmentInput::PerColumn(vec![
                Alignment::Left,
                Alignment::Decimal {
                    integer_digits: 1,
                    decimal_digits: 2
                }
            ])
        );
        assert!("lzq".parse::<AlignmentInput>().is_err());
    }

    #[test]
    fn test_column_spec() {
        let spec = AlignmentSpec::new(vec![Alignment::Left, Alignment::Right, Alignment::Center]);
        assert_eq!(spec.column_spec(), "lrc");
    }
}
