//! Collapsed rows: runs of equal values merged into one vertical cell.

use std::collections::BTreeSet;

use tabtex_model::{CollapseSpec, Result, RulePolicy, UsageError};

use crate::table::{RenderedCell, RenderedTable, RowRule, RowSpan};

/// Package providing `\multirow`.
pub const MULTIROW_PACKAGE: &str = "multirow";

/// Sizes of runs of consecutive equal values.
///
/// ```
/// use tabtex_render::features::collapse_groups;
///
/// assert_eq!(collapse_groups(&["A", "A", "B", "B", "B", "C"]), vec![2, 3, 1]);
/// ```
pub fn collapse_groups<T: PartialEq>(values: &[T]) -> Vec<usize> {
    runs(values, &BTreeSet::new())
        .into_iter()
        .map(|(_, len)| len)
        .collect()
}

/// `(start, len)` runs that never cross a row in `boundaries`.
/// 1-based column ranges of `row` not covered by a cell spanning from above.
fn open_segments(row: &[RenderedCell]) -> Vec<(usize, usize)> {
    let mut segments: Vec<(usize, usize)> = Vec::new();
    for (index, cell) in row.iter().enumerate() {
        if cell.span == RowSpan::Covered {
            continue;
        }
        let column = index + 1;
        match segments.last_mut() {
            Some((_, to)) if *to + 1 == column => *to = column,
            _ => segments.push((column, column)),
        }
    }
    segments
}

fn runs<T: PartialEq>(values: &[T], boundaries: &BTreeSet<usize>) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = Vec::new();
    for (idx, value) in values.iter().enumerate() {
        let continues = idx > 0 && !boundaries.contains(&idx) && values[idx - 1] == *value;
        if continues && let Some((_, len)) = out.last_mut() {
            *len += 1;
        } else {
            out.push((idx, 1));
        }
    }
    out
}

/// Merge runs in the requested columns and place row rules.
///
/// Columns are processed left to right; a run never crosses a group boundary
/// of a column to its left that is also collapsed.
pub fn apply_collapse(table: &mut RenderedTable, spec: &CollapseSpec) -> Result<()> {
    let mut columns = Vec::with_capacity(spec.columns.len());
    for column in &spec.columns {
        let idx = table
            .names
            .resolve(column)
            .ok_or_else(|| UsageError::unknown_column("collapse_rows", column.to_string()))?;
        columns.push(idx);
    }
    columns.sort_unstable();
    columns.dedup();
    if columns.is_empty() {
        return Ok(());
    }

    let height = table.height();
    let mut boundaries = BTreeSet::new();
    let mut first_runs = Vec::new();
    for (position, &column) in columns.iter().enumerate() {
        let texts: Vec<String> = table
            .column_texts(column)
            .into_iter()
            .map(str::to_string)
            .collect();
        let column_runs = runs(&texts, &boundaries);
        for &(start, len) in &column_runs {
            boundaries.insert(start);
            if len < 2 {
                continue;
            }
            table.rows[start][column].span = RowSpan::Start {
                rows: len,
                valign: spec.valign,
            };
            for row in &mut table.rows[start + 1..start + len] {
                row[column].span = RowSpan::Covered;
            }
        }
        if position == 0 {
            first_runs = column_runs;
        }
    }

    table.rules_after.clear();
    match &spec.rules {
        RulePolicy::Full => {
            for row in 0..height.saturating_sub(1) {
                let open = open_segments(&table.rows[row + 1]);
                if open.is_empty() {
                    continue;
                }
                let rule = if open == [(1, table.width())] {
                    RowRule::Mid
                } else {
                    RowRule::Partial(open)
                };
                table.rules_after.insert(row, rule);
            }
        }
        RulePolicy::Major => {
            for &(start, len) in &first_runs {
                if start + len < height {
                    table.rules_after.insert(start + len - 1, RowRule::Mid);
                }
            }
        }
        RulePolicy::None => {}
        RulePolicy::Custom(rows) => {
            for &row in rows {
                if row + 1 < height {
                    table.rules_after.insert(row, RowRule::Mid);
                } else {
                    tracing::warn!(row, height, "dropping collapse rule outside the table body");
                }
            }
        }
    }

    table.require_package(MULTIROW_PACKAGE);
    tracing::debug!(
        columns = ?columns,
        rules = table.rules_after.len(),
        "collapsed rows"
    );
    Ok(())
}
