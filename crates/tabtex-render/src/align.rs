//! Alignment resolution.

use tabtex_model::{Alignment, AlignmentInput, AlignmentSpec, Result, Table, UsageError};

/// Resolved per-column alignment plus what it requires from the preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlignment {
    pub spec: AlignmentSpec,
    /// Packages needed by the alignment (`siunitx` for decimal columns).
    pub packages: Vec<String>,
    /// 0-based indices of decimal-aligned columns.
    pub decimal_columns: Vec<usize>,
}

impl ResolvedAlignment {
    fn from_spec(spec: AlignmentSpec) -> Self {
        let mut packages: Vec<String> = Vec::new();
        let mut decimal_columns = Vec::new();
        for (idx, alignment) in spec.entries().iter().enumerate() {
            if alignment.is_decimal() {
                decimal_columns.push(idx);
            }
            for package in alignment.required_packages() {
                if !packages.iter().any(|p| p == package) {
                    packages.push((*package).to_string());
                }
            }
        }
        Self {
            spec,
            packages,
            decimal_columns,
        }
    }

    pub fn is_decimal(&self, column: usize) -> bool {
        self.decimal_columns.contains(&column)
    }
}

/// Numeric columns right-aligned, everything else left-aligned.
pub fn auto_align(table: &Table) -> AlignmentSpec {
    AlignmentSpec::new(
        (0..table.width())
            .map(|idx| {
                if table.is_numeric_column(idx) {
                    Alignment::Right
                } else {
                    Alignment::Left
                }
            })
            .collect(),
    )
}

/// Turn the caller's request into one alignment per column.
pub fn resolve_alignment(input: &AlignmentInput, table: &Table) -> Result<ResolvedAlignment> {
    let spec = match input {
        AlignmentInput::Auto => auto_align(table),
        AlignmentInput::Single(alignment) => AlignmentSpec::new(vec![*alignment; table.width()]),
        AlignmentInput::PerColumn(entries) => {
            if entries.len() != table.width() {
                return Err(UsageError::AlignmentLength {
                    expected: table.width(),
                    actual: entries.len(),
                });
            }
            AlignmentSpec::new(entries.clone())
        }
    };
    tracing::debug!(spec = %spec.column_spec(), "resolved alignment");
    Ok(ResolvedAlignment::from_spec(spec))
}
