//! Invariant text coercions.
//!
//! These are the only parse routines in the crate. The binder, the compiled
//! closures and the generated dispatchers all call into this module, which is
//! what keeps the three strategies' coercion byte-for-byte identical. None of
//! them consult the process locale.

use crate::value::{SemanticType, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Layouts accepted for date-time arguments, tried in order.
///
/// `%.f` also matches an absent fraction.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Returns `true` for empty or whitespace-only text.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

pub fn string(raw: &str) -> Option<String> {
    Some(raw.to_owned())
}

pub fn int32(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

pub fn float32(raw: &str) -> Option<f32> {
    raw.trim().parse().ok()
}

pub fn float64(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Parses a decimal directly from its digits, never through `f64`.
pub fn decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

pub fn boolean(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses ISO-8601-like date-times.
///
/// Accepts a bare date (midnight), date and time separated by `T` or a space
/// with optional seconds and fraction, and RFC 3339 with an offset, which is
/// normalized to UTC.
pub fn datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Resolves an enum argument to a variant ordinal.
///
/// The exact variant name wins; otherwise a decimal ordinal within range is
/// accepted.
pub fn enum_index<S: AsRef<str>>(variants: &[S], raw: &str) -> Option<usize> {
    let raw = raw.trim();
    variants
        .iter()
        .position(|v| v.as_ref() == raw)
        .or_else(|| raw.parse::<usize>().ok().filter(|i| *i < variants.len()))
}

/// Coerces non-blank text to a [`Value`] of the given semantic type.
pub fn to_value<S: AsRef<str>>(ty: SemanticType, variants: &[S], raw: &str) -> Option<Value> {
    match ty {
        SemanticType::String => string(raw).map(Value::String),
        SemanticType::Int32 => int32(raw).map(Value::Int32),
        SemanticType::Float32 => float32(raw).map(Value::Float32),
        SemanticType::Float64 => float64(raw).map(Value::Float64),
        SemanticType::Decimal => decimal(raw).map(Value::Decimal),
        SemanticType::Boolean => boolean(raw).map(Value::Boolean),
        SemanticType::DateTime => datetime(raw).map(Value::DateTime),
        SemanticType::Enum => {
            enum_index(variants, raw).map(|i| Value::Enum(variants[i].as_ref().to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(string("  padded  ").as_deref(), Some("  padded  "));
    }

    #[test]
    fn test_int32() {
        assert_eq!(int32("42"), Some(42));
        assert_eq!(int32(" -7 "), Some(-7));
        assert_eq!(int32("+3"), Some(3));
        assert_eq!(int32("1,000"), None);
        assert_eq!(int32("2147483648"), None);
        assert_eq!(int32("4.0"), None);
    }

    #[test]
    fn test_floats_are_invariant() {
        assert_eq!(float64("3.14"), Some(3.14));
        assert_eq!(float64("3,14"), None);
        assert_eq!(float32("1e3"), Some(1000.0));
    }

    #[test]
    fn test_decimal_keeps_precision() {
        let d = decimal("12345.6789").unwrap();
        assert_eq!(d.to_string(), "12345.6789");
        assert_eq!(decimal("0.1").unwrap() + decimal("0.2").unwrap(), decimal("0.3").unwrap());
        assert_eq!(decimal("12,5"), None);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean("true"), Some(true));
        assert_eq!(boolean("False"), Some(false));
        assert_eq!(boolean(" TRUE "), Some(true));
        assert_eq!(boolean("yes"), None);
        assert_eq!(boolean("1"), None);
    }

    #[test]
    fn test_datetime_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(datetime("2024-12-31T23:59:59"), Some(expected));
        assert_eq!(datetime("2024-12-31 23:59:59"), Some(expected));
        assert_eq!(datetime("2024-12-31T23:59:59+00:00"), Some(expected));
        assert_eq!(datetime("2025-01-01T00:59:59+01:00"), Some(expected));

        let midnight = datetime("2024-12-31").unwrap();
        assert_eq!(midnight.hour(), 0);

        let fractional = datetime("2024-12-31T23:59:59.250").unwrap();
        assert_eq!(fractional.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_datetime_rejects_culture_formats() {
        assert_eq!(datetime("12/31/2024"), None);
        assert_eq!(datetime("31.12.2024"), None);
        assert_eq!(datetime("not a date"), None);
    }

    #[test]
    fn test_enum_index() {
        let variants = ["Left", "Right"];
        assert_eq!(enum_index(&variants, "Right"), Some(1));
        assert_eq!(enum_index(&variants, " Left "), Some(0));
        assert_eq!(enum_index(&variants, "1"), Some(1));
        assert_eq!(enum_index(&variants, "2"), None);
        assert_eq!(enum_index(&variants, "left"), None);
    }

    #[test]
    fn test_to_value_dispatches_on_type() {
        let none: [&str; 0] = [];
        assert_eq!(
            to_value(SemanticType::Int32, &none, "5"),
            Some(Value::Int32(5))
        );
        assert_eq!(
            to_value(SemanticType::Enum, &["A", "B"], "B"),
            Some(Value::Enum("B".into()))
        );
        assert_eq!(to_value(SemanticType::Boolean, &none, "nope"), None);
    }
}
