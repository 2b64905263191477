//! LaTeX compilation and PDF post-processing.
//!
//! Everything here shells out to external programs: a LaTeX engine
//! (`pdflatex`, `xelatex`, `lualatex`), `pdfcrop`, `pdftoppm` and
//! `pdftocairo`. Each is probed on `PATH` before it is run so that a missing
//! installation is reported with a hint instead of a spawn error.

pub mod driver;
pub mod error;
pub mod postprocess;
pub mod tools;

pub use driver::{
    CompilationRequest, CompileStage, Compiler, MAX_DIAGNOSTICS, compile, log_diagnostics,
};
pub use error::{CompileError, PostProcessError, ToolError};
pub use postprocess::{
    DEFAULT_DPI, DEFAULT_MARGIN, Margins, convert_to_raster, convert_to_vector, crop_pdf,
};
pub use tools::{Engine, ToolPaths, find_executable, require_tool};
