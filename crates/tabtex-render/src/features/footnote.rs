//! Footnotes below the table.

use tabtex_model::FootnoteSpec;

use crate::sanitize::sanitize_cell_text;
use crate::table::{Note, NoteGroup, RenderedTable};

/// Package that keeps notes in a box with the table.
pub const BOXED_NOTES_PACKAGE: &str = "threeparttable";

const SYMBOLS: [&str; 6] = ["*", "\\dag", "\\ddag", "\\S", "\\P", "\\|"];

/// Marker for the `index`-th numbered note: `1`, `2`, ...
pub fn number_marker(index: usize) -> String {
    (index + 1).to_string()
}

/// Marker for the `index`-th alphabetic note: `a` ... `z`, `aa`, `ab`, ...
pub fn alphabet_marker(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    out.iter().rev().collect()
}

/// Marker for the `index`-th symbol note.
///
/// The six symbols repeat doubled, then tripled, once exhausted.
pub fn symbol_marker(index: usize) -> String {
    SYMBOLS[index % SYMBOLS.len()].repeat(index / SYMBOLS.len() + 1)
}

/// Marker markup safe in text mode.
pub fn marker_markup(marker: &str) -> String {
    if marker.contains("\\|") {
        format!("${marker}$")
    } else {
        marker.to_string()
    }
}

/// Superscript marker, for use inside cells or captions.
pub fn superscript(marker: &str) -> String {
    format!("\\textsuperscript{{{}}}", marker_markup(marker))
}

fn group(
    title: &str,
    notes: &[String],
    marker: impl Fn(usize) -> Option<String>,
) -> Option<NoteGroup> {
    if notes.is_empty() {
        return None;
    }
    Some(NoteGroup {
        title: sanitize_cell_text(title),
        notes: notes
            .iter()
            .enumerate()
            .map(|(idx, text)| Note {
                marker: marker(idx),
                text: sanitize_cell_text(text),
            })
            .collect(),
    })
}

/// Attach footnote groups in the order general, number, alphabet, symbol.
///
/// Boxed notes fall back to appended rows for page-breaking tables.
pub fn apply_footnotes(table: &mut RenderedTable, spec: &FootnoteSpec, long_table: bool) {
    if spec.is_empty() {
        return;
    }
    table.notes = [
        group(&spec.general_title, &spec.general, |_| None),
        group(&spec.number_title, &spec.number, |idx| Some(number_marker(idx))),
        group(&spec.alphabet_title, &spec.alphabet, |idx| {
            Some(alphabet_marker(idx))
        }),
        group(&spec.symbol_title, &spec.symbol, |idx| Some(symbol_marker(idx))),
    ]
    .into_iter()
    .flatten()
    .collect();

    if spec.boxed && long_table {
        tracing::warn!("boxed footnotes are not supported in long tables; appending rows instead");
    }
    table.notes_boxed = spec.boxed && !long_table;
    if table.notes_boxed {
        table.require_package(BOXED_NOTES_PACKAGE);
    }
}
