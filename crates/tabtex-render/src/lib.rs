//! LaTeX document synthesis for tabtex.
//!
//! Turns a validated [`Table`] plus style and feature configuration into a
//! complete LaTeX document. Rendering is pure: no files are written and no
//! processes are started here.
//!
//! # Pipeline
//!
//! 1. [`resolve_alignment`] and [`compose_style`] produce layout parameters.
//! 2. [`RenderedTable::prepare`] sanitizes names and cells.
//! 3. [`apply_features`] layers headers, collapsed rows, cell formats and
//!    footnotes in a fixed order.
//! 4. [`assemble`] emits the document.

pub mod align;
pub mod assemble;
pub mod features;
pub mod sanitize;
pub mod style;
pub mod table;
pub mod theme;

pub use align::{ResolvedAlignment, auto_align, resolve_alignment};
pub use assemble::{BASE_PACKAGES, LONG_TABLE_PACKAGE, assemble, document_style, package_line};
pub use features::{apply_features, collapse_groups};
pub use sanitize::{
    MAX_FILENAME_LEN, column_header_text, is_markup, sanitize_cell_text, sanitize_cells,
    sanitize_column_name, sanitize_column_names, sanitize_filename,
};
pub use style::{DEFAULT_DOCUMENT_CLASS, DEFAULT_SHADING, compose_style};
pub use table::{RenderedCell, RenderedColumn, RenderedTable, RowRule, RowSpan};
pub use theme::{ThemeRegistry, resolve_theme};

use tabtex_model::{
    AlignmentInput, ColumnNames, FeatureSet, RenderOptions, Result, StyleConfig, StyleOverrides,
    Table, ThemeRecord,
};

/// A rendered document and the configuration it was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    /// Complete LaTeX source.
    pub source: String,
    /// Resolved style, including every package the document loads.
    pub style: StyleConfig,
    /// Whether the page-breaking environment was used.
    pub long_table: bool,
    /// Original-to-sanitized column mapping.
    pub names: ColumnNames,
}

/// Render a table to LaTeX source.
///
/// Every usage error (alignment length, header spans, unknown collapse
/// column) surfaces here, before anything touches the filesystem.
pub fn render_document(
    table: &Table,
    theme: &ThemeRecord,
    overrides: &StyleOverrides,
    align: &AlignmentInput,
    features: &FeatureSet,
    options: &RenderOptions,
) -> Result<RenderedDocument> {
    let _span = tracing::debug_span!("render", rows = table.height(), columns = table.width())
        .entered();
    let alignment = resolve_alignment(align, table)?;
    let style = compose_style(theme, overrides);
    let long_table = options.is_long(table.height());

    let mut rendered = RenderedTable::prepare(table, &alignment, options.digits);
    apply_features(&mut rendered, &style, features, long_table)?;

    let style = document_style(&rendered, &style, &alignment, long_table);
    let source = assemble(&rendered, &style, &alignment, options);
    tracing::debug!(bytes = source.len(), long_table, "assembled document");
    Ok(RenderedDocument {
        source,
        style,
        long_table,
        names: rendered.names,
    })
}
