//! Spanning header rows.

use tabtex_model::{Result, SpanningHeader, UsageError};

use crate::sanitize::sanitize_cell_text;
use crate::table::{RenderedHeaderCell, RenderedTable};

/// Validate spanning headers and attach them above the column header.
///
/// Each row's spans must be positive and sum to the column count.
pub fn apply_spanning_headers(table: &mut RenderedTable, headers: &[SpanningHeader]) -> Result<()> {
    let width = table.width();
    let mut rows = Vec::with_capacity(headers.len());
    for (row, header) in headers.iter().enumerate() {
        if let Some(cell) = header.cells.iter().find(|cell| cell.span == 0) {
            return Err(UsageError::ZeroSpan {
                row,
                label: cell.label.clone(),
            });
        }
        let actual = header.total_span();
        if actual != width {
            return Err(UsageError::HeaderSpan {
                row,
                expected: width,
                actual,
            });
        }
        rows.push(
            header
                .cells
                .iter()
                .map(|cell| RenderedHeaderCell {
                    text: sanitize_cell_text(&cell.label),
                    span: cell.span,
                })
                .collect::<Vec<_>>(),
        );
    }
    if !rows.is_empty() {
        tracing::debug!(rows = rows.len(), "added spanning headers");
    }
    table.header_rows = rows;
    Ok(())
}

/// 1-based inclusive column ranges under each non-empty label.
pub fn header_rule_ranges(row: &[RenderedHeaderCell]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 1;
    for cell in row {
        if !cell.text.trim().is_empty() {
            ranges.push((start, start + cell.span - 1));
        }
        start += cell.span;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
    use tabtex_model::{AlignmentInput, Table};

    use super::*;
    use crate::align::resolve_alignment;

    fn rendered() -> RenderedTable {
        let cols: Vec<Column> = vec![
            Series::new("arm".into(), vec!["A"]).into_column(),
            Series::new("n".into(), vec![1i64]).into_column(),
            Series::new("pct".into(), vec![2.5f64]).into_column(),
        ];
        let table = Table::new(DataFrame::new(cols).unwrap()).unwrap();
        let alignment = resolve_alignment(&AlignmentInput::Auto, &table).unwrap();
        RenderedTable::prepare(&table, &alignment, None)
    }

    #[test]
    fn test_valid_header() {
        let mut table = rendered();
        apply_spanning_headers(
            &mut table,
            &[SpanningHeader::new([("", 1), ("Treatment & dose", 2)])],
        )
        .unwrap();
        assert_eq!(table.header_rows.len(), 1);
        assert_eq!(table.header_rows[0][1].text, "Treatment \\& dose");
        assert_eq!(header_rule_ranges(&table.header_rows[0]), vec![(2, 3)]);
    }

    #[test]
    fn test_span_mismatch_names_row() {
        let mut table = rendered();
        let err = apply_spanning_headers(
            &mut table,
            &[
                SpanningHeader::new([("All", 3)]),
                SpanningHeader::new([("", 1), ("Treatment", 3)]),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            UsageError::HeaderSpan {
                row: 1,
                expected: 3,
                actual: 4
            }
        );
        assert!(table.header_rows.is_empty());
    }

    #[test]
    fn test_zero_span_rejected() {
        let mut table = rendered();
        let err = apply_spanning_headers(
            &mut table,
            &[SpanningHeader::new([("Empty", 0), ("All", 3)])],
        )
        .unwrap_err();
        assert!(matches!(err, UsageError::ZeroSpan { row: 0, .. }));
    }
}
