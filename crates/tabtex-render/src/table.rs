//! Intermediate, fully sanitized table representation.
//!
//! A [`RenderedTable`] is built once from a [`Table`] and then decorated by
//! the feature appliers before the assembler turns it into LaTeX.

use std::collections::BTreeMap;

use tabtex_common::any_to_string_with_digits;
use tabtex_model::{CellStyle, CellValue, ColumnNames, Table, VerticalAlign};

use crate::align::ResolvedAlignment;
use crate::sanitize::{column_header_text, sanitize_cell_text, sanitize_column_names};

/// One output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedColumn {
    /// Sanitized, unique key.
    pub key: String,
    /// Header text as typeset (underscores escaped).
    pub header: String,
    /// Decimal-aligned (`S`) column.
    pub decimal: bool,
}

/// Vertical merge state of a body cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowSpan {
    #[default]
    Single,
    /// First cell of a merged run covering `rows` rows.
    Start { rows: usize, valign: VerticalAlign },
    /// Covered by a merged cell above; rendered empty.
    Covered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    /// Sanitized text.
    pub text: String,
    /// Original value, for predicates.
    pub value: CellValue,
    pub style: CellStyle,
    pub span: RowSpan,
}

/// A rule drawn below a body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRule {
    /// Full-width `\midrule`.
    Mid,
    /// One `\cmidrule{from-to}` per segment, 1-based inclusive columns.
    Partial(Vec<(usize, usize)>),
}

/// One cell of a spanning header row, already sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeaderCell {
    pub text: String,
    pub span: usize,
}

/// A single note line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Marker markup (`1`, `a`, `\dag`); `None` for general notes.
    pub marker: Option<String>,
    pub text: String,
}

/// A titled group of notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteGroup {
    pub title: String,
    pub notes: Vec<Note>,
}

/// Table content plus decorations, ready to assemble.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub names: ColumnNames,
    pub columns: Vec<RenderedColumn>,
    /// Spanning header rows, outermost first.
    pub header_rows: Vec<Vec<RenderedHeaderCell>>,
    pub header_bold: bool,
    pub rows: Vec<Vec<RenderedCell>>,
    /// Rules keyed by the 0-based body row they follow.
    pub rules_after: BTreeMap<usize, RowRule>,
    pub notes: Vec<NoteGroup>,
    /// Notes go in a `threeparttable` block instead of appended rows.
    pub notes_boxed: bool,
    /// Packages required by applied features, in first-use order.
    pub packages: Vec<String>,
}

impl RenderedTable {
    /// Sanitize names and cells of `table`.
    ///
    /// Floats are rounded to `digits` decimals when set.
    pub fn prepare(table: &Table, alignment: &ResolvedAlignment, digits: Option<usize>) -> Self {
        let names = sanitize_column_names(&table.column_names());
        let columns = names
            .iter()
            .enumerate()
            .map(|(idx, name)| RenderedColumn {
                key: name.key.clone(),
                header: column_header_text(&name.key),
                decimal: alignment.is_decimal(idx),
            })
            .collect();
        let rows = (0..table.height())
            .map(|row| {
                (0..table.width())
                    .map(|col| {
                        let raw = table.any_value(row, col);
                        let value = CellValue::from(raw.clone());
                        RenderedCell {
                            text: sanitize_cell_text(&any_to_string_with_digits(raw, digits)),
                            value,
                            style: CellStyle::default(),
                            span: RowSpan::Single,
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            names,
            columns,
            header_rows: Vec::new(),
            header_bold: false,
            rows,
            rules_after: BTreeMap::new(),
            notes: Vec::new(),
            notes_boxed: false,
            packages: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Record a package requirement, keeping first-use order.
    pub fn require_package(&mut self, package: &str) {
        if !self.packages.iter().any(|p| p == package) {
            self.packages.push(package.to_string());
        }
    }

    /// Text of one column, top to bottom.
    pub fn column_texts(&self, column: usize) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row.get(column).map_or("", |cell| cell.text.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
    use tabtex_model::{Alignment, AlignmentInput};

    use super::*;
    use crate::align::resolve_alignment;

    fn test_table() -> Table {
        let cols: Vec<Column> = vec![
            Series::new("group name".into(), vec!["R&D", "Ops"]).into_column(),
            Series::new("share".into(), vec![0.126f64, 0.5]).into_column(),
            Series::new("flag".into(), vec![Some(true), None]).into_column(),
        ];
        Table::new(DataFrame::new(cols).unwrap()).unwrap()
    }

    #[test]
    fn test_prepare_sanitizes() {
        let table = test_table();
        let alignment = resolve_alignment(&AlignmentInput::Auto, &table).unwrap();
        let rendered = RenderedTable::prepare(&table, &alignment, None);

        assert_eq!(rendered.columns[0].key, "group_name");
        assert_eq!(rendered.columns[0].header, "group\\_name");
        assert_eq!(rendered.rows[0][0].text, "R\\&D");
        assert_eq!(rendered.rows[0][0].value, CellValue::Text("R&D".to_string()));
        assert_eq!(rendered.rows[0][1].text, "0.126");
        assert_eq!(rendered.rows[0][2].text, "TRUE");
        assert_eq!(rendered.rows[1][2].text, "");
        assert!(rendered.rows[1][2].value.is_missing());
    }

    #[test]
    fn test_prepare_rounds_digits() {
        let table = test_table();
        let alignment = resolve_alignment(
            &AlignmentInput::PerColumn(vec![
                Alignment::Left,
                Alignment::Decimal {
                    integer_digits: 1,
                    decimal_digits: 2,
                },
                Alignment::Center,
            ]),
            &table,
        )
        .unwrap();
        let rendered = RenderedTable::prepare(&table, &alignment, Some(2));
        assert_eq!(rendered.column_texts(1), vec!["0.13", "0.50"]);
        assert!(rendered.columns[1].decimal);
        assert_eq!(rendered.rows[0][1].value, CellValue::Float(0.126));
    }

    #[test]
    fn test_require_package_dedups() {
        let table = test_table();
        let alignment = resolve_alignment(&AlignmentInput::Auto, &table).unwrap();
        let mut rendered = RenderedTable::prepare(&table, &alignment, None);
        rendered.require_package("multirow");
        rendered.require_package("multirow");
        assert_eq!(rendered.packages, vec!["multirow"]);
    }
}
