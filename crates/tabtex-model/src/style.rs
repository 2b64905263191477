//! Style configuration, themes and overrides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UsageError;

/// Font-size directive applied to the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Tiny,
    Scriptsize,
    Footnotesize,
    Small,
    Normalsize,
    Large,
}

impl FontSize {
    /// LaTeX size switch.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Tiny => "\\tiny",
            Self::Scriptsize => "\\scriptsize",
            Self::Footnotesize => "\\footnotesize",
            Self::Small => "\\small",
            Self::Normalsize => "\\normalsize",
            Self::Large => "\\large",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive().trim_start_matches('\\'))
    }
}

impl FromStr for FontSize {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('\\').to_ascii_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "scriptsize" => Ok(Self::Scriptsize),
            "footnotesize" => Ok(Self::Footnotesize),
            "small" => Ok(Self::Small),
            "normalsize" => Ok(Self::Normalsize),
            "large" => Ok(Self::Large),
            _ => Err(UsageError::invalid_parameter(
                "font_size",
                format!(
                    "unknown size '{s}' (valid: tiny, scriptsize, footnotesize, small, normalsize, large)"
                ),
            )),
        }
    }
}

/// A named bundle of style defaults.
///
/// Every field is optional; unset fields fall through to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeRecord {
    pub name: String,
    pub shading_color: Option<String>,
    pub document_class: Option<String>,
    pub extra_packages: Vec<String>,
    pub header_bold: Option<bool>,
    pub striped: Option<bool>,
    pub font_size: Option<FontSize>,
}

impl ThemeRecord {
    /// The neutral record used when no theme is requested.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Explicit per-call style arguments. These win over any theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub shading_color: Option<String>,
    pub document_class: Option<String>,
    pub extra_packages: Vec<String>,
    pub header_bold: Option<bool>,
    pub striped: Option<bool>,
    pub font_size: Option<FontSize>,
}

/// How the caller selects a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeChoice {
    /// Look the name up in a registry.
    Named(String),
    /// Use this record as-is.
    Record(ThemeRecord),
}

impl From<&str> for ThemeChoice {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<ThemeRecord> for ThemeChoice {
    fn from(record: ThemeRecord) -> Self {
        Self::Record(record)
    }
}

/// Fully resolved style. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    /// Row shading colour (`None` disables shading).
    pub shading_color: Option<String>,
    pub document_class: String,
    /// Ordered, deduplicated preamble entries.
    pub extra_packages: Vec<String>,
    pub header_bold: bool,
    pub striped: bool,
    pub font_size: Option<FontSize>,
}

impl StyleConfig {
    /// Append packages, keeping first-occurrence order and dropping duplicates.
    #[must_use]
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for package in packages {
            let package = package.into();
            if !package.trim().is_empty() && !self.extra_packages.contains(&package) {
                self.extra_packages.push(package);
            }
        }
        self
    }

    /// Whether body rows alternate with the shading colour.
    pub fn stripe_color(&self) -> Option<&str> {
        if self.striped {
            self.shading_color.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StyleConfig {
        StyleConfig {
            shading_color: Some("blue!10".to_string()),
            document_class: "article".to_string(),
            extra_packages: vec!["booktabs".to_string()],
            header_bold: true,
            striped: true,
            font_size: None,
        }
    }

    #[test]
    fn test_with_packages_dedups_in_order() {
        let style = base().with_packages(["multirow", "booktabs", "siunitx", "multirow"]);
        assert_eq!(
            style.extra_packages,
            vec!["booktabs", "multirow", "siunitx"]
        );
    }

    #[test]
    fn test_stripe_color() {
        assert_eq!(base().stripe_color(), Some("blue!10"));
        let mut plain = base();
        plain.striped = false;
        assert_eq!(plain.stripe_color(), None);
    }

    #[test]
    fn test_font_size_parse() {
        assert_eq!("small".parse::<FontSize>().unwrap(), FontSize::Small);
        assert_eq!("\\tiny".parse::<FontSize>().unwrap(), FontSize::Tiny);
        assert!("huge-ish".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_theme_record_from_toml() {
        let record: ThemeRecord = toml::from_str(
            r#"
            name = "journal"
            shading_color = "gray!15"
            font_size = "small"
            extra_packages = ["helvet"]
            "#,
        )
        .unwrap();
        assert_eq!(record.name, "journal");
        assert_eq!(record.font_size, Some(FontSize::Small));
        assert_eq!(record.striped, None);
    }
}
