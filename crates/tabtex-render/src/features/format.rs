//! Conditional and positional cell formatting.

use tabtex_model::{CellFormatSpec, CellSelector};

use crate::table::RenderedTable;

/// Resolve a selector to `(rows, columns)` index lists.
///
/// Out-of-range rows and unresolvable columns are dropped with a warning.
fn resolve_selector(table: &RenderedTable, selector: &CellSelector) -> (Vec<usize>, Vec<usize>) {
    let rows = match &selector.rows {
        None => (0..table.height()).collect(),
        Some(rows) => rows
            .iter()
            .copied()
            .filter(|&row| {
                let keep = row < table.height();
                if !keep {
                    tracing::warn!(row, height = table.height(), "cell format row out of range");
                }
                keep
            })
            .collect(),
    };
    let columns = match &selector.columns {
        None => (0..table.width()).collect(),
        Some(columns) => columns
            .iter()
            .filter_map(|column| {
                let idx = table.names.resolve(column);
                if idx.is_none() {
                    tracing::warn!(column = %column, "cell format column not found");
                }
                idx
            })
            .collect(),
    };
    (rows, columns)
}

/// Apply formats in order, merging styles field by field.
///
/// Predicates see the original cell value. A predicate error counts as a
/// non-match.
pub fn apply_cell_formats(table: &mut RenderedTable, formats: &[CellFormatSpec]) {
    for format in formats {
        let (rows, columns) = resolve_selector(table, &format.selector);
        let mut styled = 0usize;
        for &row in &rows {
            for &column in &columns {
                let cell = &mut table.rows[row][column];
                let matched = match &format.selector.predicate {
                    None => true,
                    Some(predicate) => predicate.evaluate(&cell.value).unwrap_or(false),
                };
                if matched {
                    cell.style.merge(&format.style);
                    styled += 1;
                }
            }
        }
        tracing::debug!(cells = styled, "applied cell format");
    }
}
