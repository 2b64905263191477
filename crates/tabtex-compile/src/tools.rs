//! External program discovery and configuration.

use std::env;
use std::fmt;
use std::path::{self, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToolError;

pub const TEX_HINT: &str = "install a TeX distribution such as TeX Live or MiKTeX";
pub const PDFCROP_HINT: &str = "pdfcrop ships with TeX Live; install it with tlmgr install pdfcrop";
pub const POPPLER_HINT: &str = "install poppler-utils";

/// LaTeX engine used to compile documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Engine {
    #[default]
    Pdflatex,
    Xelatex,
    Lualatex,
    /// Explicit program name or path.
    Program(String),
}

impl Engine {
    pub fn program(&self) -> &str {
        match self {
            Self::Pdflatex => "pdflatex",
            Self::Xelatex => "xelatex",
            Self::Lualatex => "lualatex",
            Self::Program(program) => program,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl From<&str> for Engine {
    fn from(value: &str) -> Self {
        match value.trim() {
            "pdflatex" => Self::Pdflatex,
            "xelatex" => Self::Xelatex,
            "lualatex" => Self::Lualatex,
            other => Self::Program(other.to_string()),
        }
    }
}

impl From<String> for Engine {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl FromStr for Engine {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<Engine> for String {
    fn from(value: Engine) -> Self {
        value.program().to_string()
    }
}

/// Program names (or paths) of the post-processing tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub pdfcrop: String,
    pub pdftoppm: String,
    pub pdftocairo: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            pdfcrop: "pdfcrop".to_string(),
            pdftoppm: "pdftoppm".to_string(),
            pdftocairo: "pdftocairo".to_string(),
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Locate a program: paths are checked directly, bare names on `PATH`.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    let found = if candidate.components().count() > 1 || candidate.is_absolute() {
        is_executable(candidate).then(|| candidate.to_path_buf())
    } else {
        let path_var = env::var_os("PATH")?;
        env::split_paths(&path_var).find_map(|dir| {
            let full = dir.join(program);
            if is_executable(&full) {
                return Some(full);
            }
            if cfg!(windows) {
                let exe = dir.join(format!("{program}.exe"));
                if is_executable(&exe) {
                    return Some(exe);
                }
            }
            None
        })
    }?;
    // Children run in another directory, so relative hits must be anchored here.
    path::absolute(&found).ok()
}

/// Locate a program or report it missing with an install hint.
pub fn require_tool(program: &str, hint: &str) -> Result<PathBuf, ToolError> {
    find_executable(program).ok_or_else(|| {
        tracing::warn!(tool = program, "required tool not found");
        ToolError::Missing {
            tool: program.to_string(),
            hint: hint.to_string(),
        }
    })
}
