//! Usage errors: structurally invalid caller configuration.
//!
//! These are raised before any file is written or external process started,
//! and are never retried.

use std::path::PathBuf;
use thiserror::Error;

/// Caller-supplied configuration that cannot produce a table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    /// Table has no rows or no columns.
    #[error("table: cannot render an empty table ({rows} rows, {columns} columns)")]
    EmptyTable { rows: usize, columns: usize },

    /// Per-column alignment vector has the wrong length.
    #[error("align: expected {expected} entries (one per column), got {actual}")]
    AlignmentLength { expected: usize, actual: usize },

    /// Alignment token could not be parsed.
    #[error(
        "align: invalid alignment '{value}' (valid: l, c, r, left, center, right, d<I>.<D>, S[table-format=I.D])"
    )]
    InvalidAlignment { value: String },

    /// Spanning header spans do not cover the table.
    #[error("header_above[{row}]: spans sum to {actual}, but the table has {expected} columns")]
    HeaderSpan {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Spanning header cell with a zero span.
    #[error("header_above[{row}]: header '{label}' spans zero columns")]
    ZeroSpan { row: usize, label: String },

    /// Crop margins must be one or four numbers.
    #[error("crop_margins: expected 1 or 4 values, got {count}")]
    MarginArity { count: usize },

    /// Crop margin value is not a number.
    #[error("crop_margins: '{value}' is not a number")]
    InvalidMargin { value: String },

    /// Theme name not present in the registry.
    #[error("theme: unknown theme '{name}' (available: {available})")]
    UnknownTheme { name: String, available: String },

    /// Column reference that must resolve but does not.
    #[error("{parameter}: unknown column '{column}'")]
    UnknownColumn { parameter: String, column: String },

    /// Output directory is missing or not writable.
    #[error("output_dir: {path} {reason}")]
    OutputDirectory { path: PathBuf, reason: String },

    /// Any other parameter outside its valid range.
    #[error("{parameter}: {message}")]
    InvalidParameter { parameter: String, message: String },
}

/// Result type alias for model validation.
pub type Result<T> = std::result::Result<T, UsageError>;

impl UsageError {
    /// Create an UnknownColumn error.
    pub fn unknown_column(parameter: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            parameter: parameter.into(),
            column: column.into(),
        }
    }

    /// Create an OutputDirectory error.
    pub fn output_directory(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::OutputDirectory {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Name of the offending parameter, as used in messages.
    pub fn parameter(&self) -> &str {
        match self {
            Self::EmptyTable { .. } => "table",
            Self::AlignmentLength { .. } | Self::InvalidAlignment { .. } => "align",
            Self::HeaderSpan { .. } | Self::ZeroSpan { .. } => "header_above",
            Self::MarginArity { .. } | Self::InvalidMargin { .. } => "crop_margins",
            Self::UnknownTheme { .. } => "theme",
            Self::OutputDirectory { .. } => "output_dir",
            Self::UnknownColumn { parameter, .. } | Self::InvalidParameter { parameter, .. } => {
                parameter
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UsageError::AlignmentLength {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "align: expected 3 entries (one per column), got 2"
        );

        let err = UsageError::UnknownTheme {
            name: "nature".to_string(),
            available: "default, jama".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "theme: unknown theme 'nature' (available: default, jama)"
        );
    }

    #[test]
    fn test_parameter_names() {
        assert_eq!(UsageError::MarginArity { count: 2 }.parameter(), "crop_margins");
        assert_eq!(
            UsageError::unknown_column("collapse_rows", "grp").parameter(),
            "collapse_rows"
        );
        assert_eq!(
            UsageError::output_directory("/nope", "does not exist").parameter(),
            "output_dir"
        );
    }
}
