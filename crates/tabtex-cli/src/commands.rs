//! Subcommand implementations.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tabtex_core::{CsvSource, GenerateOptions, TableSource, generate_table};
use tabtex_model::{AlignmentInput, Table};
use tabtex_render::{render_document, resolve_theme};
use tracing::info_span;

use crate::cli::{RenderArgs, TableArgs, ThemesArgs};
use crate::config::TableConfig;
use crate::summary::RenderSummary;

fn load_config(path: Option<&Path>) -> Result<TableConfig> {
    match path {
        Some(path) => TableConfig::load(path),
        None => Ok(TableConfig::default()),
    }
}

fn csv_source(args: &TableArgs) -> Result<CsvSource> {
    if !args.separator.is_ascii() {
        bail!("separator must be a single ASCII character, got '{}'", args.separator);
    }
    Ok(CsvSource::new(&args.input).with_separator(args.separator as u8))
}

fn default_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Apply table flags on top of the config file values.
pub fn apply_table_args(options: &mut GenerateOptions, args: &TableArgs) -> Result<()> {
    if let Some(theme) = &args.theme {
        options.theme = Some(theme.as_str().into());
    }
    if let Some(align) = &args.align {
        options.align = align.parse::<AlignmentInput>().context("parse --align")?;
    }
    if args.caption.is_some() {
        options.render.caption.clone_from(&args.caption);
    }
    if args.digits.is_some() {
        options.render.digits = args.digits;
    }
    if args.long_table {
        options.render.long_table = Some(true);
    } else if args.no_long_table {
        options.render.long_table = Some(false);
    }
    if args.shading.is_some() {
        options.style.shading_color.clone_from(&args.shading);
    }
    if args.font_size.is_some() {
        options.style.font_size = args.font_size;
    }
    if args.document_class.is_some() {
        options.style.document_class.clone_from(&args.document_class);
    }
    options.style.extra_packages.extend(args.packages.iter().cloned());
    Ok(())
}

/// Build pipeline options from the config file and render flags.
pub fn render_options(args: &RenderArgs) -> Result<GenerateOptions> {
    let config = load_config(args.table.config.as_deref())?;
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| default_name(&args.table.input));
    let mut options = config.to_options(&name, args.output_dir.clone())?;
    if args.name.is_some() {
        options.name = name;
    }
    apply_table_args(&mut options, &args.table)?;
    if args.no_crop {
        options.crop = false;
    }
    if let Some(margins) = args.crop_margins {
        options.crop_margins = margins;
    }
    options.png |= args.png;
    options.svg |= args.svg;
    if let Some(dpi) = args.dpi {
        options.dpi = dpi;
    }
    if let Some(engine) = &args.engine {
        options.engine = engine.clone();
    }
    if let Some(secs) = args.timeout {
        options.timeout = Some(
            std::time::Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid --timeout {secs}"))?,
        );
    }
    Ok(options)
}

pub fn run_render(args: &RenderArgs) -> Result<RenderSummary> {
    let options = render_options(args)?;
    let source = csv_source(&args.table)?;
    let span = info_span!("render", input = %args.table.input.display());
    let _guard = span.enter();
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("create output directory {}", options.output_dir.display()))?;
    let start = Instant::now();
    let generated = generate_table(&source, &options)
        .with_context(|| format!("render {}", args.table.input.display()))?;
    Ok(RenderSummary::new(&generated, start.elapsed()))
}

/// Assembled LaTeX source for a CSV file, without compiling it.
pub fn run_preview(args: &TableArgs) -> Result<String> {
    let config = load_config(args.config.as_deref())?;
    let mut options = config.to_options(&default_name(&args.input), ".".into())?;
    apply_table_args(&mut options, args)?;
    let frame = csv_source(args)?.load()?;
    let table = Table::new(frame)?;
    let theme = resolve_theme(options.theme.as_ref(), &options.registry)?;
    let document = render_document(
        &table,
        &theme,
        &options.style,
        &options.align,
        &options.features,
        &options.render,
    )?;
    Ok(document.source)
}

pub fn run_themes(args: &ThemesArgs) -> Result<()> {
    let registry = load_config(args.config.as_deref())?.registry();
    if args.json {
        let themes: Vec<_> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&themes)?);
    } else {
        println!("{}", crate::summary::themes_table(&registry));
    }
    Ok(())
}
