//! Table generation pipeline: source, LaTeX, PDF, cropped PDF, images.
//!
//! [`generate_table`] is the single entry point. It validates everything it
//! can before touching the filesystem, then compiles and post-processes.

pub mod error;
pub mod source;

pub use error::{GenerateError, Result};
pub use source::{CsvSource, SourceError, TableSource};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tabtex_compile::{
    CompilationRequest, CompileError, Compiler, DEFAULT_DPI, Engine, Margins, ToolPaths,
    convert_to_raster, convert_to_vector, crop_pdf,
};
use tabtex_model::{
    AlignmentInput, FeatureSet, RenderOptions, StyleOverrides, Table, ThemeChoice, UsageError,
};
use tabtex_render::{
    MAX_FILENAME_LEN, ThemeRegistry, render_document, resolve_theme, sanitize_filename,
};

/// Suffix of the cropped PDF's base name.
pub const CROPPED_SUFFIX: &str = "_cropped";

/// Everything that controls one generated table.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Base name of the output files; sanitized before use.
    pub name: String,
    /// Existing, writable directory.
    pub output_dir: PathBuf,
    pub theme: Option<ThemeChoice>,
    /// Where named themes are looked up.
    pub registry: ThemeRegistry,
    pub style: StyleOverrides,
    pub align: AlignmentInput,
    pub features: FeatureSet,
    pub render: RenderOptions,
    pub crop: bool,
    pub crop_margins: Margins,
    pub png: bool,
    pub svg: bool,
    pub dpi: u32,
    pub engine: Engine,
    pub timeout: Option<Duration>,
    pub tools: ToolPaths,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            name: "table".to_string(),
            output_dir: PathBuf::from("."),
            theme: None,
            registry: ThemeRegistry::builtin(),
            style: StyleOverrides::default(),
            align: AlignmentInput::Auto,
            features: FeatureSet::default(),
            render: RenderOptions::default(),
            crop: true,
            crop_margins: Margins::default(),
            png: false,
            svg: false,
            dpi: DEFAULT_DPI,
            engine: Engine::default(),
            timeout: None,
            tools: ToolPaths::default(),
        }
    }
}

impl GenerateOptions {
    pub fn new(name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<ThemeChoice>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: AlignmentInput) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = features;
        self
    }

    /// Sanitized base name, capped at [`MAX_FILENAME_LEN`].
    pub fn file_stem(&self) -> String {
        let mut stem = sanitize_filename(&self.name);
        stem.truncate(MAX_FILENAME_LEN);
        stem
    }
}

/// Files produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTable {
    /// Sanitized base name.
    pub name: String,
    pub tex: PathBuf,
    pub pdf: PathBuf,
    pub cropped: Option<PathBuf>,
    pub png: Option<PathBuf>,
    pub svg: Option<PathBuf>,
    pub long_table: bool,
}

impl GeneratedTable {
    /// The cropped PDF if there is one, else the uncropped PDF.
    pub fn primary(&self) -> &Path {
        self.cropped.as_deref().unwrap_or(&self.pdf)
    }

    /// Every produced file, in pipeline order.
    pub fn files(&self) -> Vec<&Path> {
        let mut files = vec![self.tex.as_path(), self.pdf.as_path()];
        files.extend(
            [&self.cropped, &self.png, &self.svg]
                .into_iter()
                .filter_map(|path| path.as_deref()),
        );
        files
    }
}

/// The output directory must already exist and be writable.
fn check_output_dir(dir: &Path) -> std::result::Result<(), UsageError> {
    let metadata = dir
        .metadata()
        .map_err(|_| UsageError::output_directory(dir, "does not exist"))?;
    if !metadata.is_dir() {
        return Err(UsageError::output_directory(dir, "is not a directory"));
    }
    // Permission bits do not account for ownership or ACLs; try a real file.
    tempfile::NamedTempFile::new_in(dir)
        .map(drop)
        .map_err(|_| UsageError::output_directory(dir, "is not writable"))
}

/// Derived files from an earlier run must not survive a failed one.
fn remove_stale_outputs(dir: &Path, name: &str) -> std::result::Result<(), CompileError> {
    for file in [
        format!("{name}{CROPPED_SUFFIX}.pdf"),
        format!("{name}.png"),
        format!("{name}.svg"),
    ] {
        let path = dir.join(file);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "removing stale output");
            fs::remove_file(&path).map_err(|source| CompileError::Io { path, source })?;
        }
    }
    Ok(())
}

/// Render, compile and post-process one table.
///
/// All usage errors (empty table, bad alignment, header spans, unknown
/// theme or collapse column, bad output directory) are raised before any
/// file is written.
pub fn generate_table<S: TableSource + ?Sized>(
    source: &S,
    options: &GenerateOptions,
) -> Result<GeneratedTable> {
    let name = options.file_stem();
    let _span = tracing::info_span!("generate", name = %name).entered();

    let table = Table::new(source.load()?)?;
    tracing::debug!(
        source = %source.label(),
        rows = table.height(),
        columns = table.width(),
        "loaded table"
    );
    check_output_dir(&options.output_dir)?;
    let theme = resolve_theme(options.theme.as_ref(), &options.registry)?;
    let document = render_document(
        &table,
        &theme,
        &options.style,
        &options.align,
        &options.features,
        &options.render,
    )?;

    remove_stale_outputs(&options.output_dir, &name)?;
    let request = CompilationRequest::new(document.source, &options.output_dir, &name);
    let tex = request.tex_path();
    let pdf = Compiler::new(options.engine.clone())
        .with_timeout(options.timeout)
        .compile(&request)?;

    let cropped = if options.crop {
        let output = options
            .output_dir
            .join(format!("{name}{CROPPED_SUFFIX}.pdf"));
        Some(crop_pdf(&options.tools, &pdf, &output, &options.crop_margins)?)
    } else {
        None
    };

    let mut generated = GeneratedTable {
        name,
        tex,
        pdf,
        cropped,
        png: None,
        svg: None,
        long_table: document.long_table,
    };
    if options.png {
        let output = options.output_dir.join(format!("{}.png", generated.name));
        generated.png = Some(convert_to_raster(
            &options.tools,
            generated.primary(),
            &output,
            options.dpi,
        )?);
    }
    if options.svg {
        let output = options.output_dir.join(format!("{}.svg", generated.name));
        generated.svg = Some(convert_to_vector(&options.tools, generated.primary(), &output)?);
    }
    tracing::info!(primary = %generated.primary().display(), "generated table");
    Ok(generated)
}
