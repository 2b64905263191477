//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tabtex_compile::{Engine, Margins};
use tabtex_model::FontSize;

#[derive(Parser)]
#[command(
    name = "tabtex",
    version,
    about = "Render data tables as publication-quality LaTeX, PDF and images",
    long_about = "Render CSV tables as booktabs LaTeX, compile them to PDF and crop the result.\n\n\
                  Requires a LaTeX engine and pdfcrop on PATH; PNG and SVG output also\n\
                  need pdftoppm and pdftocairo from poppler."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a CSV file to LaTeX, PDF and optional images.
    Render(RenderArgs),

    /// Print the LaTeX source for a CSV file without compiling it.
    Preview(TableArgs),

    /// List the registered themes.
    Themes(ThemesArgs),
}

/// Options shared by every command that renders a table.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// CSV file with a header row.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Table configuration file (TOML).
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Field separator of the CSV file.
    #[arg(long, default_value_t = ',')]
    pub separator: char,

    /// Theme name (built-in or defined in the config file).
    #[arg(long, short = 't')]
    pub theme: Option<String>,

    /// Column alignment: auto, one token for all columns, "lrc" or "l, d2.1, r".
    #[arg(long, short = 'a')]
    pub align: Option<String>,

    #[arg(long)]
    pub caption: Option<String>,

    /// Round floating-point cells to this many decimals.
    #[arg(long)]
    pub digits: Option<usize>,

    /// Force the page-breaking longtable environment.
    #[arg(long, conflicts_with = "no_long_table")]
    pub long_table: bool,

    /// Never use the page-breaking longtable environment.
    #[arg(long)]
    pub no_long_table: bool,

    /// Stripe colour for alternating rows, or "none".
    #[arg(long, value_name = "COLOR")]
    pub shading: Option<String>,

    #[arg(long, value_name = "SIZE")]
    pub font_size: Option<FontSize>,

    #[arg(long, value_name = "CLASS")]
    pub document_class: Option<String>,

    /// Extra preamble package (repeatable), e.g. "helvet" or "[T1]{fontenc}".
    #[arg(long = "package", value_name = "PACKAGE")]
    pub packages: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Output directory (created if missing).
    #[arg(long = "output-dir", short = 'o', value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Base name of the output files (default: the CSV file stem).
    #[arg(long)]
    pub name: Option<String>,

    /// Keep only the uncropped PDF.
    #[arg(long)]
    pub no_crop: bool,

    /// Crop margins in points: one value or "left top right bottom".
    #[arg(long, value_name = "MARGINS")]
    pub crop_margins: Option<Margins>,

    /// Also write a PNG image.
    #[arg(long)]
    pub png: bool,

    /// Also write an SVG image.
    #[arg(long)]
    pub svg: bool,

    /// PNG resolution.
    #[arg(long)]
    pub dpi: Option<u32>,

    /// LaTeX engine: pdflatex, xelatex, lualatex or a program path.
    #[arg(long)]
    pub engine: Option<Engine>,

    /// Kill the LaTeX engine after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ThemesArgs {
    /// Include themes defined in this configuration file.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print themes as JSON.
    #[arg(long)]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
