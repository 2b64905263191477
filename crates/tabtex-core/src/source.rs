//! Producers of tabular input.

use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, DataFrame, PolarsError, SerReader};
use thiserror::Error;

/// Failure to produce a table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source: file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("source: failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failure reported by a caller-defined source.
    #[error("source: {message}")]
    Other { message: String },
}

impl SourceError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Anything that can produce a DataFrame to render.
///
/// Model-summary adapters and other producers plug in here; the pipeline
/// only ever sees the resulting frame.
pub trait TableSource {
    fn load(&self) -> Result<DataFrame, SourceError>;

    /// Short description for logs.
    fn label(&self) -> String {
        "data frame".to_string()
    }
}

impl TableSource for DataFrame {
    fn load(&self) -> Result<DataFrame, SourceError> {
        Ok(self.clone())
    }
}

impl<T: TableSource + ?Sized> TableSource for &T {
    fn load(&self) -> Result<DataFrame, SourceError> {
        (**self).load()
    }

    fn label(&self) -> String {
        (**self).label()
    }
}

/// Rows used to infer column types.
pub const INFER_SCHEMA_ROWS: usize = 100;

/// A CSV file with a single header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSource {
    path: PathBuf,
    separator: u8,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            separator: b',',
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvSource {
    fn load(&self) -> Result<DataFrame, SourceError> {
        if !self.path.is_file() {
            return Err(SourceError::FileNotFound {
                path: self.path.clone(),
            });
        }
        let parse_error = |e: PolarsError| SourceError::CsvParse {
            path: self.path.clone(),
            message: e.to_string(),
        };
        let separator = self.separator;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .map_parse_options(|options| options.with_separator(separator))
            .try_into_reader_with_file_path(Some(self.path.clone()))
            .map_err(parse_error)?
            .finish()
            .map_err(parse_error)?;
        tracing::debug!(
            path = %self.path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded CSV"
        );
        Ok(df)
    }

    fn label(&self) -> String {
        self.path.display().to_string()
    }
}
