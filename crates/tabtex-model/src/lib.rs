//! Core data model for tabtex.
//!
//! Everything the rendering and compilation crates exchange lives here: the
//! validated [`Table`], resolved [`StyleConfig`], per-column [`Alignment`],
//! the table feature specifications and the [`UsageError`] taxonomy.

pub mod alignment;
pub mod error;
pub mod features;
pub mod options;
pub mod style;
pub mod table;

pub use alignment::{Alignment, AlignmentInput, AlignmentSpec, DECIMAL_PACKAGE};
pub use error::{Result, UsageError};
pub use features::{
    CellFormatSpec, CellSelector, CellStyle, CollapseSpec, FeatureSet, FootnoteSpec, HeaderCell,
    Predicate, PredicateError, PredicateFn, RulePolicy, SpanningHeader, VerticalAlign,
};
pub use options::{LONG_TABLE_THRESHOLD, RenderOptions};
pub use style::{FontSize, StyleConfig, StyleOverrides, ThemeChoice, ThemeRecord};
pub use table::{CellValue, ColumnName, ColumnNames, ColumnRef, Table};
