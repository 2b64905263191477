//! Rendering options that are neither style nor features.

use serde::{Deserialize, Serialize};

/// Tables with more body rows than this switch to `longtable`.
pub const LONG_TABLE_THRESHOLD: usize = 40;

/// Content-level options for one rendered table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Caption placed above the table.
    pub caption: Option<String>,
    /// Round floating-point cells to this many decimals.
    pub digits: Option<usize>,
    /// Force (`Some(true)`) or forbid (`Some(false)`) the page-breaking
    /// environment; `None` decides by row count.
    pub long_table: Option<bool>,
}

impl RenderOptions {
    /// Whether a table with `rows` body rows uses the page-breaking environment.
    pub fn is_long(&self, rows: usize) -> bool {
        self.long_table.unwrap_or(rows > LONG_TABLE_THRESHOLD)
    }
}
