//! Feature appliers.
//!
//! Each applier decorates a [`RenderedTable`] in place. [`apply_features`]
//! runs them in the fixed order header styling, spanning headers, collapsed
//! rows, cell formatting, footnotes.

mod collapse;
mod footnote;
mod format;
mod header;

pub use collapse::{MULTIROW_PACKAGE, apply_collapse, collapse_groups};
pub use footnote::{
    BOXED_NOTES_PACKAGE, alphabet_marker, apply_footnotes, marker_markup, number_marker,
    superscript, symbol_marker,
};
pub use format::apply_cell_formats;
pub use header::{apply_spanning_headers, header_rule_ranges};

use tabtex_model::{FeatureSet, Result, StyleConfig};

use crate::table::RenderedTable;

/// Apply every requested feature in order.
pub fn apply_features(
    table: &mut RenderedTable,
    style: &StyleConfig,
    features: &FeatureSet,
    long_table: bool,
) -> Result<()> {
    table.header_bold = style.header_bold;
    apply_spanning_headers(table, &features.header_above)?;
    if let Some(collapse) = &features.collapse {
        apply_collapse(table, collapse)?;
    }
    apply_cell_formats(table, &features.cell_formats);
    if let Some(footnotes) = &features.footnotes {
        apply_footnotes(table, footnotes, long_table);
    }
    Ok(())
}
