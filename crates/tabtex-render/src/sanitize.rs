//! Escaping of untrusted strings for LaTeX source and file names.
//!
//! Every function here is total: dirty input is cleaned, never rejected.

use std::collections::BTreeSet;

use tabtex_model::{ColumnName, ColumnNames};

/// Replacement for empty column names.
pub const COLUMN_PLACEHOLDER: &str = "column";

/// Replacement for empty file names.
pub const FILENAME_PLACEHOLDER: &str = "table";

/// Longest base name the pipeline will use for output files.
pub const MAX_FILENAME_LEN: usize = 200;

fn replace_unsafe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Sanitized column key: `[A-Za-z0-9_]+`, never empty.
///
/// ```
/// use tabtex_render::sanitize::sanitize_column_name;
///
/// assert_eq!(sanitize_column_name("col #1"), "col__1");
/// assert_eq!(sanitize_column_name(""), "column");
/// ```
pub fn sanitize_column_name(name: &str) -> String {
    if name.is_empty() {
        return COLUMN_PLACEHOLDER.to_string();
    }
    replace_unsafe(name)
}

/// Header text for a sanitized key, with underscores escaped for typesetting.
pub fn column_header_text(key: &str) -> String {
    key.replace('_', "\\_")
}

/// Sanitize all names and disambiguate collisions.
///
/// The first occurrence keeps the bare key; later ones get `_2`, `_3`, ...
/// skipping any suffix that is already taken.
pub fn sanitize_column_names<S: AsRef<str>>(names: &[S]) -> ColumnNames {
    let keys: Vec<String> = names
        .iter()
        .map(|name| sanitize_column_name(name.as_ref()))
        .collect();
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut entries = Vec::with_capacity(names.len());
    for (original, key) in names.iter().zip(keys.iter()) {
        let mut unique = key.clone();
        let mut suffix = 2usize;
        while taken.contains(&unique) || (unique != *key && keys.contains(&unique)) {
            unique = format!("{key}_{suffix}");
            suffix += 1;
        }
        if unique != *key {
            tracing::debug!(
                original = original.as_ref(),
                key = %unique,
                "renamed duplicate column"
            );
        }
        taken.insert(unique.clone());
        entries.push(ColumnName {
            original: original.as_ref().to_string(),
            key: unique,
        });
    }
    ColumnNames::new(entries)
}

/// File-system-safe base name: `[A-Za-z0-9_]+`, never empty.
///
/// No length limit is applied here; see [`MAX_FILENAME_LEN`].
pub fn sanitize_filename(name: &str) -> String {
    if name.is_empty() {
        return FILENAME_PLACEHOLDER.to_string();
    }
    replace_unsafe(name)
}

/// Whether text contains a backslash followed by a letter, i.e. looks like
/// embedded LaTeX markup.
pub fn is_markup(text: &str) -> bool {
    text.as_bytes()
        .windows(2)
        .any(|pair| pair[0] == b'\\' && pair[1].is_ascii_alphabetic())
}

/// Escape a cell for embedding in a LaTeX table.
///
/// `#`, `%`, `&` and `$` get a backslash and `<`/`>` become text-mode
/// commands. Text that already contains markup (see [`is_markup`]) passes
/// through untouched. Not idempotent: sanitize exactly once.
pub fn sanitize_cell_text(text: &str) -> String {
    if is_markup(text) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '#' | '%' | '&' | '$' => {
                out.push('\\');
                out.push(c);
            }
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            other => out.push(other),
        }
    }
    out
}

/// [`sanitize_cell_text`] over a sequence of cells.
pub fn sanitize_cells<S: AsRef<str>>(cells: &[S]) -> Vec<String> {
    cells
        .iter()
        .map(|cell| sanitize_cell_text(cell.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_replaces_specials() {
        assert_eq!(sanitize_column_name("col #1"), "col__1");
        assert_eq!(sanitize_column_name("p-value (%)"), "p_value____");
        assert_eq!(sanitize_column_name("ok_name9"), "ok_name9");
        assert_eq!(sanitize_column_name("é"), "_");
    }

    #[test]
    fn test_column_header_text_escapes_underscores() {
        assert_eq!(column_header_text("col__1"), "col\\_\\_1");
        assert_eq!(column_header_text("plain"), "plain");
    }

    #[test]
    fn test_duplicate_names_get_suffixes() {
        let names = sanitize_column_names(&["a b", "a_b", "a-b", "a_b_2"]);
        let keys: Vec<&str> = names.keys().collect();
        assert_eq!(keys, vec!["a_b", "a_b_3", "a_b_4", "a_b_2"]);
        assert_eq!(names.get(1).unwrap().original, "a_b");
    }

    #[test]
    fn test_filename() {
        assert_eq!(sanitize_filename("my table.v2"), "my_table_v2");
        assert_eq!(sanitize_filename(""), "table");
        assert_eq!(sanitize_filename("../etc/passwd"), "___etc_passwd");
    }

    #[test]
    fn test_cell_escaping() {
        assert_eq!(sanitize_cell_text("100%"), "100\\%");
        assert_eq!(sanitize_cell_text("R&D"), "R\\&D");
        assert_eq!(sanitize_cell_text("Item #1"), "Item \\#1");
        assert_eq!(sanitize_cell_text("$5"), "\\$5");
        assert_eq!(
            sanitize_cell_text("a<b>c"),
            "a\\textless{}b\\textgreater{}c"
        );
    }

    #[test]
    fn test_markup_passthrough() {
        let marked = "23.5$^{*}$\\textsuperscript{a}";
        assert_eq!(sanitize_cell_text(marked), marked);
        assert!(is_markup("\\textbf{x}"));
        assert!(!is_markup("\\1"));
        assert!(!is_markup("plain"));
    }

    #[test]
    fn test_sanitize_cells() {
        assert_eq!(sanitize_cells(&["50%", "ok"]), vec!["50\\%", "ok"]);
    }
}
