//! Validated tabular input and column naming.

use std::fmt;

use polars::prelude::{AnyValue, DataFrame, DataType};
use tabtex_common::{any_to_string, format_numeric, is_numeric_dtype, parse_f64};

use crate::error::{Result, UsageError};

/// A non-empty table ready for rendering.
///
/// The wrapped `DataFrame` is never mutated; all rendering stages read from it.
#[derive(Debug, Clone)]
pub struct Table {
    data: DataFrame,
}

impl Table {
    /// Wrap a DataFrame, rejecting tables with zero rows or zero columns.
    pub fn new(data: DataFrame) -> Result<Self> {
        if data.height() == 0 || data.width() == 0 {
            return Err(UsageError::EmptyTable {
                rows: data.height(),
                columns: data.width(),
            });
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Number of body rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.data.width()
    }

    /// Original (unsanitized) column names, in order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect()
    }

    pub fn dtype(&self, column: usize) -> Option<&DataType> {
        self.data.get_columns().get(column).map(|c| c.dtype())
    }

    /// Whether the column holds integers or floats.
    pub fn is_numeric_column(&self, column: usize) -> bool {
        self.dtype(column).is_some_and(is_numeric_dtype)
    }

    /// Raw Polars value of a cell (`Null` when out of range).
    pub fn any_value(&self, row: usize, column: usize) -> AnyValue<'_> {
        self.data
            .get_columns()
            .get(column)
            .and_then(|c| c.get(row).ok())
            .unwrap_or(AnyValue::Null)
    }

    /// Cell lifted into a [`CellValue`].
    pub fn cell(&self, row: usize, column: usize) -> CellValue {
        CellValue::from(self.any_value(row, column))
    }
}

impl TryFrom<DataFrame> for Table {
    type Error = UsageError;

    fn try_from(data: DataFrame) -> Result<Self> {
        Self::new(data)
    }
}

/// A single cell value, independent of Polars lifetimes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell; numeric-looking text is parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(s) => parse_f64(s),
            Self::Missing | Self::Bool(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_numeric(*v)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<AnyValue<'_>> for CellValue {
    fn from(value: AnyValue<'_>) -> Self {
        match value {
            AnyValue::Null => Self::Missing,
            AnyValue::Boolean(b) => Self::Bool(b),
            AnyValue::Float32(v) => Self::Float(f64::from(v)),
            AnyValue::Float64(v) => Self::Float(v),
            AnyValue::String(s) => Self::Text(s.to_string()),
            AnyValue::StringOwned(s) => Self::Text(s.to_string()),
            other if other.dtype().is_integer() => other
                .extract::<i64>()
                .map(Self::Int)
                .or_else(|| other.extract::<f64>().map(Self::Float))
                .unwrap_or_else(|| Self::Text(any_to_string(other))),
            other => Self::Text(any_to_string(other)),
        }
    }
}

/// Reference to a column by 0-based position or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "#{idx}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ColumnRef {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Original name and its sanitized, unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnName {
    pub original: String,
    pub key: String,
}

/// Ordered mapping from original column names to sanitized keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnNames {
    entries: Vec<ColumnName>,
}

impl ColumnNames {
    pub fn new(entries: Vec<ColumnName>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnName> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn get(&self, idx: usize) -> Option<&ColumnName> {
        self.entries.get(idx)
    }

    /// Resolve a column reference to its position.
    ///
    /// Names match the original name first, then the sanitized key.
    pub fn resolve(&self, column: &ColumnRef) -> Option<usize> {
        match column {
            ColumnRef::Index(idx) => (*idx < self.entries.len()).then_some(*idx),
            ColumnRef::Name(name) => self
                .entries
                .iter()
                .position(|entry| entry.original == *name)
                .or_else(|| self.entries.iter().position(|entry| entry.key == *name)),
        }
    }
}
