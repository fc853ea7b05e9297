//! Polars AnyValue utility functions.
//!
//! Cell values are compared as strings for equality filters and read as
//! floats by the series extractor, whatever dtype inference picked.

use polars::prelude::*;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, formats floats without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts AnyValue to String, returning None if the result is blank.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Formats a float without a trailing `.0` for integral values.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    let parsed = match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parses a string as f64, returning None for invalid or empty strings.
///
/// Thousands separators written as spaces (`"1 234.5"`) are accepted.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Some(v);
    }
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.parse::<f64>().ok()
}

/// Reads one cell as a string; missing columns and rows read as empty.
pub fn cell_string(df: &DataFrame, column: &str, idx: usize) -> String {
    match df.column(column) {
        Ok(series) => any_to_string(series.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_formats_integral_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(496.0)), "496");
        assert_eq!(any_to_string(AnyValue::Float64(34.25)), "34.25");
        assert_eq!(any_to_string(AnyValue::Int64(4)), "4");
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_format_numeric_keeps_integer_zeros() {
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(1e21), format!("{}", 1e21));
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Int64(87)), Some(87.0));
        assert_eq!(any_to_f64(AnyValue::String(" 20.5 ")), Some(20.5));
        assert_eq!(any_to_f64(AnyValue::String("1 234")), Some(1234.0));
        assert_eq!(any_to_f64(AnyValue::String("...")), None);
        assert_eq!(any_to_f64(AnyValue::Float64(f64::NAN)), None);
        assert_eq!(any_to_f64(AnyValue::Null), None);
    }

    #[test]
    fn test_cell_string() {
        let df = df!("ISO_code" => ["MNG", "AFG"]).unwrap();
        assert_eq!(cell_string(&df, "ISO_code", 1), "AFG");
        assert_eq!(cell_string(&df, "missing", 0), "");
        assert_eq!(cell_string(&df, "ISO_code", 9), "");
    }
}
