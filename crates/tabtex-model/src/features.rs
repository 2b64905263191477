//! Optional table features: spanning headers, collapsed rows, cell
//! formatting and footnotes.
//!
//! Each feature is a plain specification; the renderer applies them in a
//! fixed order (headers, collapse, cell formats, footnotes).

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::{CellValue, ColumnRef};

/// All features requested for one table.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    /// Spanning header rows, outermost first.
    pub header_above: Vec<SpanningHeader>,
    pub collapse: Option<CollapseSpec>,
    /// Applied in registration order.
    pub cell_formats: Vec<CellFormatSpec>,
    pub footnotes: Option<FootnoteSpec>,
}

// ============================================================================
// Spanning headers
// ============================================================================

/// One cell of a spanning header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub label: String,
    pub span: usize,
}

impl HeaderCell {
    pub fn new(label: impl Into<String>, span: usize) -> Self {
        Self {
            label: label.into(),
            span,
        }
    }
}

/// A header row whose cells span groups of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanningHeader {
    pub cells: Vec<HeaderCell>,
}

impl SpanningHeader {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(label, span)| HeaderCell::new(label, span))
                .collect(),
        }
    }

    pub fn total_span(&self) -> usize {
        self.cells.iter().map(|cell| cell.span).sum()
    }
}

// ============================================================================
// Collapsed rows
// ============================================================================

/// Vertical placement of merged cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl VerticalAlign {
    /// `\multirow` position option.
    pub fn multirow_option(&self) -> &'static str {
        match self {
            Self::Top => "[t]",
            Self::Middle => "",
            Self::Bottom => "[b]",
        }
    }
}

/// Where horizontal rules go in a collapsed table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RulePolicy {
    /// A rule at every row boundary, never crossing a merged cell.
    #[default]
    Full,
    /// Rules only between groups of the first collapsed column.
    Major,
    None,
    /// Rules after the given 0-based body rows.
    Custom(Vec<usize>),
}

/// Merge runs of equal values in the given columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseSpec {
    pub columns: Vec<ColumnRef>,
    pub valign: VerticalAlign,
    pub rules: RulePolicy,
}

impl CollapseSpec {
    pub fn new<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_valign(mut self, valign: VerticalAlign) -> Self {
        self.valign = valign;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulePolicy) -> Self {
        self.rules = rules;
        self
    }
}

// ============================================================================
// Cell formatting
// ============================================================================

/// Visual attributes for a cell. Unset fields leave earlier styles intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Foreground (text) colour.
    pub color: Option<String>,
    /// Background colour.
    pub background: Option<String>,
}

impl CellStyle {
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Field-level merge: every attribute set on `other` overwrites ours.
    pub fn merge(&mut self, other: &CellStyle) {
        if other.bold.is_some() {
            self.bold = other.bold;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.color.is_some() {
            self.color.clone_from(&other.color);
        }
        if other.background.is_some() {
            self.background.clone_from(&other.background);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bold.is_none()
            && self.italic.is_none()
            && self.color.is_none()
            && self.background.is_none()
    }
}

/// Predicate failure. Always treated as "does not match".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("predicate: {message}")]
pub struct PredicateError {
    pub message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signature of caller-supplied predicates.
pub type PredicateFn = dyn Fn(&CellValue) -> Result<bool, PredicateError> + Send + Sync;

/// Condition evaluated per targeted cell.
#[derive(Clone)]
pub enum Predicate {
    GreaterThan(f64),
    LessThan(f64),
    /// Canonical text equals the given string.
    Equals(String),
    /// Canonical text matches the regex.
    Matches(Regex),
    Missing,
    Custom(Arc<PredicateFn>),
}

impl Predicate {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&CellValue) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn evaluate(&self, value: &CellValue) -> Result<bool, PredicateError> {
        match self {
            Self::GreaterThan(threshold) => numeric(value).map(|v| v > *threshold),
            Self::LessThan(threshold) => numeric(value).map(|v| v < *threshold),
            Self::Equals(expected) => Ok(value.to_string() == *expected),
            Self::Matches(regex) => Ok(regex.is_match(&value.to_string())),
            Self::Missing => Ok(value.is_missing()),
            Self::Custom(f) => f(value),
        }
    }
}

fn numeric(value: &CellValue) -> Result<f64, PredicateError> {
    value
        .as_f64()
        .ok_or_else(|| PredicateError::new(format!("'{value}' is not numeric")))
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan(v) => f.debug_tuple("GreaterThan").field(v).finish(),
            Self::LessThan(v) => f.debug_tuple("LessThan").field(v).finish(),
            Self::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Self::Matches(re) => f.debug_tuple("Matches").field(&re.as_str()).finish(),
            Self::Missing => f.write_str("Missing"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Which cells a format applies to. Unset parts select everything.
#[derive(Debug, Clone, Default)]
pub struct CellSelector {
    /// 0-based body rows.
    pub rows: Option<Vec<usize>>,
    pub columns: Option<Vec<ColumnRef>>,
    pub predicate: Option<Predicate>,
}

impl CellSelector {
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.rows = Some(rows.into_iter().collect());
        self
    }

    #[must_use]
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn when(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }
}

/// A selector plus the style to apply to the selected cells.
#[derive(Debug, Clone)]
pub struct CellFormatSpec {
    pub selector: CellSelector,
    pub style: CellStyle,
}

impl CellFormatSpec {
    pub fn new(selector: CellSelector, style: CellStyle) -> Self {
        Self { selector, style }
    }
}

// ============================================================================
// Footnotes
// ============================================================================

/// Notes appended below the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootnoteSpec {
    /// Unlabeled notes.
    pub general: Vec<String>,
    /// Notes marked 1, 2, 3, ...
    pub number: Vec<String>,
    /// Notes marked a, b, c, ...
    pub alphabet: Vec<String>,
    /// Notes marked *, dagger, double dagger, ...
    pub symbol: Vec<String>,
    pub general_title: String,
    pub number_title: String,
    pub alphabet_title: String,
    pub symbol_title: String,
    /// Keep notes in a box with the table (`threeparttable`).
    pub boxed: bool,
}

impl Default for FootnoteSpec {
    fn default() -> Self {
        Self {
            general: Vec::new(),
            number: Vec::new(),
            alphabet: Vec::new(),
            symbol: Vec::new(),
            general_title: "Note: ".to_string(),
            number_title: String::new(),
            alphabet_title: String::new(),
            symbol_title: String::new(),
            boxed: false,
        }
    }
}

impl FootnoteSpec {
    pub fn is_empty(&self) -> bool {
        self.general.is_empty()
            && self.number.is_empty()
            && self.alphabet.is_empty()
            && self.symbol.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_style_field_merge() {
        let mut style = CellStyle::bold().with_color("red");
        style.merge(&CellStyle::italic().with_color("blue"));
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.italic, Some(true));
        assert_eq!(style.color.as_deref(), Some("blue"));
        assert_eq!(style.background, None);
    }

    #[test]
    fn test_predicates() {
        assert_eq!(
            Predicate::GreaterThan(1.0).evaluate(&CellValue::Float(1.5)),
            Ok(true)
        );
        assert_eq!(
            Predicate::LessThan(1.0).evaluate(&CellValue::Int(3)),
            Ok(false)
        );
        assert!(
            Predicate::GreaterThan(1.0)
                .evaluate(&CellValue::Text("n/a".to_string()))
                .is_err()
        );
        assert_eq!(
            Predicate::Equals("2.5".to_string()).evaluate(&CellValue::Float(2.5)),
            Ok(true)
        );
        let re = Regex::new("^p<").unwrap();
        assert_eq!(
            Predicate::Matches(re).evaluate(&CellValue::Text("p<0.05".to_string())),
            Ok(true)
        );
        assert_eq!(Predicate::Missing.evaluate(&CellValue::Missing), Ok(true));
    }

    #[test]
    fn test_custom_predicate() {
        let even = Predicate::custom(|value| match value {
            CellValue::Int(v) => Ok(v % 2 == 0),
            _ => Err(PredicateError::new("not an integer")),
        });
        assert_eq!(even.evaluate(&CellValue::Int(4)), Ok(true));
        assert!(even.evaluate(&CellValue::Missing).is_err());
        assert_eq!(format!("{even:?}"), "Custom(..)");
    }

    #[test]
    fn test_spanning_header_total() {
        let header = SpanningHeader::new([("", 1), ("Treatment", 2)]);
        assert_eq!(header.total_span(), 3);
    }

    #[test]
    fn test_footnote_defaults() {
        let notes = FootnoteSpec::default();
        assert!(notes.is_empty());
        assert_eq!(notes.general_title, "Note: ");
        assert!(!notes.boxed);
    }
}
