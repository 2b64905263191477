//! PDF cropping and format conversion through external tools.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabtex_common::format_numeric;
use tabtex_model::UsageError;

use crate::error::PostProcessError;
use crate::tools::{PDFCROP_HINT, POPPLER_HINT, ToolPaths, require_tool};

/// Margin used when the caller does not set one, in PostScript points.
pub const DEFAULT_MARGIN: f64 = 10.0;

pub const DEFAULT_DPI: u32 = 300;

/// Lines of tool stderr kept in errors.
const STDERR_TAIL_LINES: usize = 5;

/// Crop margins in points: left, top, right, bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn uniform(margin: f64) -> Self {
        Self {
            left: margin,
            top: margin,
            right: margin,
            bottom: margin,
        }
    }

    /// One value for all sides, or four values (left, top, right, bottom).
    pub fn from_values(values: &[f64]) -> Result<Self, UsageError> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(UsageError::InvalidMargin {
                value: format_numeric(*bad),
            });
        }
        match values {
            [margin] => Ok(Self::uniform(*margin)),
            [left, top, right, bottom] => Ok(Self {
                left: *left,
                top: *top,
                right: *right,
                bottom: *bottom,
            }),
            _ => Err(UsageError::MarginArity {
                count: values.len(),
            }),
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.left == self.top && self.top == self.right && self.right == self.bottom
    }

    /// Value of pdfcrop's `--margins` argument.
    pub fn argument(&self) -> String {
        if self.is_uniform() {
            format_numeric(self.left)
        } else {
            [self.left, self.top, self.right, self.bottom]
                .iter()
                .map(|v| format_numeric(*v))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

impl fmt::Display for Margins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argument())
    }
}

impl FromStr for Margins {
    type Err = UsageError;

    /// Parses `"10"` or `"5 10 5 10"` (commas also separate).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>().map_err(|_| UsageError::InvalidMargin {
                    value: part.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_values(&values)
    }
}

impl TryFrom<Vec<f64>> for Margins {
    type Error = UsageError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_values(&values)
    }
}

impl From<Margins> for Vec<f64> {
    fn from(value: Margins) -> Self {
        if value.is_uniform() {
            vec![value.left]
        } else {
            vec![value.left, value.top, value.right, value.bottom]
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n")
}

/// Probe, run and check one tool invocation.
fn run_tool(
    stage: &'static str,
    program: &str,
    hint: &str,
    args: &[&OsStr],
) -> Result<(), PostProcessError> {
    let path =
        require_tool(program, hint).map_err(|source| PostProcessError::Tool { stage, source })?;
    tracing::debug!(stage, program = %path.display(), ?args, "running tool");
    let output = Command::new(&path)
        .args(args)
        .output()
        .map_err(|source| PostProcessError::Spawn {
            stage,
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        let stderr = stderr_tail(&output.stderr);
        tracing::error!(stage, program, status = %output.status, %stderr, "tool failed");
        return Err(PostProcessError::Failed {
            stage,
            program: program.to_string(),
            status: output.status.to_string(),
            stderr,
        });
    }
    Ok(())
}

fn require_input(stage: &'static str, input: &Path) -> Result<(), PostProcessError> {
    if input.is_file() {
        Ok(())
    } else {
        Err(PostProcessError::MissingInput {
            stage,
            path: input.to_path_buf(),
        })
    }
}

fn require_output(
    stage: &'static str,
    program: &str,
    output: &Path,
) -> Result<PathBuf, PostProcessError> {
    if output.is_file() {
        tracing::info!(stage, path = %output.display(), "wrote output");
        Ok(output.to_path_buf())
    } else {
        Err(PostProcessError::MissingOutput {
            stage,
            program: program.to_string(),
            path: output.to_path_buf(),
        })
    }
}

/// Delete leftovers from an earlier run so a silent tool cannot pass.
fn clear_stale(stage: &'static str, paths: &[&Path]) -> Result<(), PostProcessError> {
    for path in paths {
        if path.is_file() {
            tracing::debug!(stage, path = %path.display(), "removing stale output");
            fs::remove_file(path).map_err(|source| PostProcessError::Io {
                stage,
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Crop whitespace around the page with `pdfcrop`.
///
/// Some pdfcrop versions ignore the output argument and write
/// `<input-stem>-crop.pdf` instead; that file is moved into place.
pub fn crop_pdf(
    tools: &ToolPaths,
    input: &Path,
    output: &Path,
    margins: &Margins,
) -> Result<PathBuf, PostProcessError> {
    const STAGE: &str = "crop";
    require_input(STAGE, input)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let fallback = input.with_file_name(format!("{stem}-crop.pdf"));
    clear_stale(STAGE, &[output, fallback.as_path()])?;
    let margins = margins.argument();
    run_tool(
        STAGE,
        &tools.pdfcrop,
        PDFCROP_HINT,
        &[
            OsStr::new("--margins"),
            OsStr::new(&margins),
            input.as_os_str(),
            output.as_os_str(),
        ],
    )?;

    if !output.exists() && fallback.is_file() {
        tracing::debug!(
            from = %fallback.display(),
            to = %output.display(),
            "moving cropped output"
        );
        fs::rename(&fallback, output).map_err(|source| PostProcessError::Io {
            stage: STAGE,
            path: fallback.clone(),
            source,
        })?;
    }
    require_output(STAGE, &tools.pdfcrop, output)
}

/// Render the first page to PNG with `pdftoppm`.
pub fn convert_to_raster(
    tools: &ToolPaths,
    input: &Path,
    output: &Path,
    dpi: u32,
) -> Result<PathBuf, PostProcessError> {
    const STAGE: &str = "png";
    require_input(STAGE, input)?;
    if dpi == 0 {
        tracing::warn!("dpi of 0 requested; using {DEFAULT_DPI}");
    }
    let dpi = (if dpi == 0 { DEFAULT_DPI } else { dpi }).to_string();
    // pdftoppm appends the extension itself.
    let stem = output.with_extension("");
    let written = stem.with_extension("png");
    clear_stale(STAGE, &[written.as_path()])?;
    run_tool(
        STAGE,
        &tools.pdftoppm,
        POPPLER_HINT,
        &[
            OsStr::new("-png"),
            OsStr::new("-r"),
            OsStr::new(&dpi),
            OsStr::new("-singlefile"),
            input.as_os_str(),
            stem.as_os_str(),
        ],
    )?;
    require_output(STAGE, &tools.pdftoppm, &written)
}

/// Convert to SVG with `pdftocairo`.
pub fn convert_to_vector(
    tools: &ToolPaths,
    input: &Path,
    output: &Path,
) -> Result<PathBuf, PostProcessError> {
    const STAGE: &str = "svg";
    require_input(STAGE, input)?;
    clear_stale(STAGE, &[output])?;
    run_tool(
        STAGE,
        &tools.pdftocairo,
        POPPLER_HINT,
        &[OsStr::new("-svg"), input.as_os_str(), output.as_os_str()],
    )?;
    require_output(STAGE, &tools.pdftocairo, output)
}
