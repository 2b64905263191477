//! Pipeline-level error aggregation.

use tabtex_compile::{CompileError, PostProcessError};
use tabtex_model::UsageError;
use thiserror::Error;

use crate::source::SourceError;

/// Any failure of [`generate_table`](crate::generate_table).
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Invalid configuration; nothing was written.
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    PostProcess(#[from] PostProcessError),
}

impl GenerateError {
    /// Pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Usage(_) => "usage",
            Self::Source(_) => "source",
            Self::Compile(_) => "compile",
            Self::PostProcess(e) => e.stage(),
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, GenerateError>;
