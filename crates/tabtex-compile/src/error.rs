//! Error types for compilation and post-processing.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A required external program is not installed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("{tool}: not found on PATH ({hint})")]
    Missing { tool: String, hint: String },
}

/// Compilation failed or could not be attempted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Target directory does not exist.
    #[error("compile: target directory {path} does not exist")]
    MissingDirectory { path: PathBuf },

    /// Writing the source or clearing stale output failed.
    #[error("compile: I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The engine could not be started.
    #[error("compile: could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The engine ran longer than the configured limit and was killed.
    #[error("compile: {program} timed out after {}s", timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },

    /// Non-zero exit or missing PDF.
    #[error("compile: {message}")]
    Failed {
        /// Log diagnostics joined by newlines, or a fallback description.
        message: String,
        exit_code: Option<i32>,
        /// Up to three `!` lines from the log.
        diagnostics: Vec<String>,
        log: PathBuf,
    },

    #[error("compile: {0}")]
    Tool(#[from] ToolError),
}

/// Cropping or conversion failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PostProcessError {
    #[error("{stage}: input {path} does not exist")]
    MissingInput { stage: &'static str, path: PathBuf },

    #[error("{stage}: could not start {program}: {source}")]
    Spawn {
        stage: &'static str,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{stage}: {program} failed ({status}): {stderr}")]
    Failed {
        stage: &'static str,
        program: String,
        status: String,
        /// Tail of the tool's stderr.
        stderr: String,
    },

    #[error("{stage}: {program} did not produce {path}")]
    MissingOutput {
        stage: &'static str,
        program: String,
        path: PathBuf,
    },

    #[error("{stage}: I/O error on {path}: {source}")]
    Io {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{stage}: {source}")]
    Tool {
        stage: &'static str,
        #[source]
        source: ToolError,
    },
}

impl PostProcessError {
    /// Pipeline stage that failed (`crop`, `png`, `svg`).
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingInput { stage, .. }
            | Self::Spawn { stage, .. }
            | Self::Failed { stage, .. }
            | Self::MissingOutput { stage, .. }
            | Self::Io { stage, .. }
            | Self::Tool { stage, .. } => stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_stage() {
        let err = CompileError::Failed {
            message: "compilation failed with exit code 1".to_string(),
            exit_code: Some(1),
            diagnostics: Vec::new(),
            log: PathBuf::from("t.log"),
        };
        assert_eq!(err.to_string(), "compile: compilation failed with exit code 1");

        let err = PostProcessError::Tool {
            stage: "svg",
            source: ToolError::Missing {
                tool: "pdftocairo".to_string(),
                hint: "install poppler-utils".to_string(),
            },
        };
        assert_eq!(err.stage(), "svg");
        assert_eq!(
            err.to_string(),
            "svg: pdftocairo: not found on PATH (install poppler-utils)"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = CompileError::Timeout {
            program: "pdflatex".to_string(),
            timeout: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "compile: pdflatex timed out after 1.5s");
    }
}
