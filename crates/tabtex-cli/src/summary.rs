//! Terminal output for the render and themes commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use tabtex_core::GeneratedTable;
use tabtex_model::ThemeRecord;
use tabtex_render::{DEFAULT_DOCUMENT_CLASS, DEFAULT_SHADING, ThemeRegistry};

/// What one `render` run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub name: String,
    pub tex: PathBuf,
    pub pdf: PathBuf,
    pub cropped: Option<PathBuf>,
    pub png: Option<PathBuf>,
    pub svg: Option<PathBuf>,
    pub primary: PathBuf,
    pub long_table: bool,
    pub elapsed_ms: u64,
}

impl RenderSummary {
    pub fn new(generated: &GeneratedTable, elapsed: Duration) -> Self {
        Self {
            name: generated.name.clone(),
            tex: generated.tex.clone(),
            pdf: generated.pdf.clone(),
            cropped: generated.cropped.clone(),
            png: generated.png.clone(),
            svg: generated.svg.clone(),
            primary: generated.primary().to_path_buf(),
            long_table: generated.long_table,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn rows(&self) -> Vec<(&'static str, Option<&Path>)> {
        vec![
            ("LaTeX", Some(self.tex.as_path())),
            ("PDF", Some(self.pdf.as_path())),
            ("Cropped PDF", self.cropped.as_deref()),
            ("PNG", self.png.as_deref()),
            ("SVG", self.svg.as_deref()),
        ]
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn summary_table(summary: &RenderSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Output"), header_cell("Path")]);
    apply_table_style(&mut table);
    for (label, path) in summary.rows() {
        let path_cell = match path {
            Some(path) if path == summary.primary => Cell::new(path.display())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Some(path) => Cell::new(path.display()),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(label), path_cell]);
    }
    table
}

pub fn print_summary(summary: &RenderSummary) {
    println!("Table: {}", summary.name);
    if summary.long_table {
        println!("Layout: longtable");
    }
    println!("{}", summary_table(summary));
    println!("Done in {} ms", summary.elapsed_ms);
}

pub fn print_summary_json(summary: &RenderSummary) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn optional_cell(value: Option<String>, fallback: &str) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell(fallback),
    }
}

fn theme_row(theme: &ThemeRecord) -> Vec<Cell> {
    vec![
        Cell::new(&theme.name).add_attribute(Attribute::Bold),
        optional_cell(theme.shading_color.clone(), DEFAULT_SHADING),
        optional_cell(theme.font_size.map(|size| size.to_string()), "normalsize"),
        optional_cell(theme.striped.map(|v| v.to_string()), "true"),
        optional_cell(theme.header_bold.map(|v| v.to_string()), "true"),
        optional_cell(theme.document_class.clone(), DEFAULT_DOCUMENT_CLASS),
        if theme.extra_packages.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(theme.extra_packages.join("\n"))
        },
    ]
}

/// Registered themes with their settings; inherited defaults are dimmed.
pub fn themes_table(registry: &ThemeRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(
        ["Theme", "Shading", "Font size", "Striped", "Bold header", "Class", "Packages"]
            .into_iter()
            .map(header_cell)
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for theme in registry.iter() {
        table.add_row(theme_row(theme));
    }
    table
}
