//! Canonical text and numbers from Polars cells.
//!
//! Output never depends on the process locale or on Polars display settings.

use polars::prelude::{AnyValue, DataType};

/// Canonical text for one cell.
///
/// Null is the empty string, floats drop trailing zeros, booleans are
/// `TRUE`/`FALSE`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use tabtex_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(flag) => if flag { "TRUE" } else { "FALSE" }.to_string(),
        AnyValue::String(text) => text.to_owned(),
        AnyValue::StringOwned(text) => text.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        other => integer_text(&other).unwrap_or_else(|| other.to_string()),
    }
}

fn integer_text(value: &AnyValue<'_>) -> Option<String> {
    let dtype = value.dtype();
    if dtype.is_unsigned_integer() {
        value.extract::<u64>().map(|v| v.to_string())
    } else if dtype.is_signed_integer() {
        value.extract::<i64>().map(|v| v.to_string())
    } else {
        None
    }
}

/// Like [`any_to_string`], but floats are rounded to `digits` decimals when set.
///
/// Integers, text and booleans are unaffected.
pub fn any_to_string_with_digits(value: AnyValue<'_>, digits: Option<usize>) -> String {
    match (value, digits) {
        (AnyValue::Float32(v), Some(digits)) => format_fixed(f64::from(v), digits),
        (AnyValue::Float64(v), Some(digits)) => format_fixed(v, digits),
        (value, _) => any_to_string(value),
    }
}

/// Shortest round-trip text for a float, never in exponent form.
///
/// Non-finite values render as `NaN`, `Inf` and `-Inf`.
///
/// # Examples
///
/// ```
/// use tabtex_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// assert_eq!(format_numeric(1e21), "1000000000000000000000");
/// ```
pub fn format_numeric(v: f64) -> String {
    if let Some(special) = non_finite(v) {
        return special.to_string();
    }
    let s = format!("{v}");
    let trimmed = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number with exactly `digits` decimals.
///
/// # Examples
///
/// ```
/// use tabtex_common::format_fixed;
///
/// assert_eq!(format_fixed(3.14159, 2), "3.14");
/// assert_eq!(format_fixed(2.0, 1), "2.0");
/// ```
pub fn format_fixed(v: f64, digits: usize) -> String {
    if let Some(special) = non_finite(v) {
        return special.to_string();
    }
    format!("{v:.digits$}")
}

fn non_finite(v: f64) -> Option<&'static str> {
    if v.is_nan() {
        Some("NaN")
    } else if v.is_infinite() {
        Some(if v > 0.0 { "Inf" } else { "-Inf" })
    } else {
        None
    }
}

/// Integer and floating-point columns. Booleans and decimals are not numeric here.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric()
}

/// Numeric value of a cell. Text is parsed; null, booleans and other types
/// give `None`.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null | AnyValue::Boolean(_) => None,
        AnyValue::String(text) => parse_f64(text),
        AnyValue::StringOwned(text) => parse_f64(&text),
        other if is_numeric_dtype(&other.dtype()) => other.extract::<f64>(),
        _ => None,
    }
}

/// Parse surrounding-whitespace-tolerant text as a float.
pub fn parse_f64(text: &str) -> Option<f64> {
    match text.trim() {
        "" => None,
        trimmed => trimmed.parse().ok(),
    }
}
