//! Property tests for sanitization and grouping.

use std::collections::BTreeSet;

use proptest::prelude::*;
use regex::Regex;
use tabtex_render::{
    collapse_groups, sanitize_cell_text, sanitize_column_name, sanitize_column_names,
    sanitize_filename,
};

fn safe_identifier(value: &str) -> bool {
    Regex::new("^[A-Za-z0-9_]+$").unwrap().is_match(value)
}

/// Every special character is preceded by a backslash and no raw angle
/// brackets remain.
fn fully_escaped(value: &str) -> bool {
    let mut prev = None;
    for c in value.chars() {
        if matches!(c, '#' | '%' | '&' | '$') && prev != Some('\\') {
            return false;
        }
        if matches!(c, '<' | '>') {
            return false;
        }
        prev = Some(c);
    }
    true
}

proptest! {
    #[test]
    fn column_names_are_identifiers(name in any::<String>()) {
        let key = sanitize_column_name(&name);
        prop_assert!(safe_identifier(&key), "unsafe key {key:?}");
    }

    #[test]
    fn filenames_are_identifiers(name in any::<String>()) {
        let file = sanitize_filename(&name);
        prop_assert!(safe_identifier(&file), "unsafe filename {file:?}");
    }

    #[test]
    fn plain_cells_are_escaped(text in "[^\\\\]*") {
        let escaped = sanitize_cell_text(&text);
        prop_assert!(fully_escaped(&escaped), "{text:?} -> {escaped:?}");
    }

    #[test]
    fn sanitized_names_are_unique(names in proptest::collection::vec("[a-c _#-]{0,3}", 1..12)) {
        let sanitized = sanitize_column_names(&names);
        let keys: BTreeSet<&str> = sanitized.keys().collect();
        prop_assert_eq!(keys.len(), names.len());
        prop_assert!(sanitized.keys().all(safe_identifier));
    }

    #[test]
    fn groups_cover_input(values in proptest::collection::vec(0u8..3, 0..40)) {
        let groups = collapse_groups(&values);
        prop_assert_eq!(groups.iter().sum::<usize>(), values.len());
        prop_assert!(groups.iter().all(|&size| size > 0));
    }
}

#[test]
fn markup_cells_pass_through() {
    let cell = "\\textbf{50%}";
    assert_eq!(sanitize_cell_text(cell), cell);
}
