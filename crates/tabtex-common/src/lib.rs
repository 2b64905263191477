//! Shared utilities for tabtex crates.
//!
//! This crate provides the Polars helpers every other crate needs to turn
//! DataFrame cells into canonical, locale-independent text.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    any_to_f64, any_to_string, any_to_string_with_digits, format_fixed, format_numeric,
    is_numeric_dtype, parse_f64,
};
