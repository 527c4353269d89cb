//! Loose-field coercion helpers.
//!
//! Vendor payloads deliver numbers as strings, empty strings for absent
//! values, and a handful of timestamp formats. These helpers normalize that
//! without ever failing an individual record.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::warn;

/// Non-empty string at `key`, numbers stringified.
pub fn str_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Float at `key`, accepting numbers or numeric strings.
pub fn f64_field(data: &Value, key: &str) -> Option<f64> {
    coerce_f64(data.get(key)?)
}

pub fn i64_field(data: &Value, key: &str) -> Option<i64> {
    match data.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn u64_field(data: &Value, key: &str) -> Option<u64> {
    match data.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

pub fn bool_field(data: &Value, key: &str) -> Option<bool> {
    match data.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        _ => None,
    }
}

pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Listing payloads arrive as a bare array or wrapped in `{"data": [...]}`.
pub fn data_array(value: &Value) -> Option<&Vec<Value>> {
    if let Some(arr) = value.as_array() {
        return Some(arr);
    }
    value.get("data")?.as_array()
}

/// `%Y-%m-%d` date at `key`.
pub fn date_field(data: &Value, key: &str) -> Option<NaiveDate> {
    let raw = str_field(data, key)?;
    parse_date(&raw)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Datetime at `key`; accepts `%Y-%m-%d %H:%M:%S`, RFC 3339 with a trailing
/// `Z`, or a bare date at midnight. Warns once per unparseable value.
pub fn datetime_field(data: &Value, key: &str) -> Option<NaiveDateTime> {
    let raw = str_field(data, key)?;
    let parsed = parse_datetime(&raw);
    if parsed.is_none() {
        warn!("Could not parse {} value {:?}", key, raw);
    }
    parsed
}

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    parse_date(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_numbers_and_numeric_strings() {
        let data = json!({"a": "198.50", "b": 42, "c": "", "d": "n/a"});
        assert_eq!(f64_field(&data, "a"), Some(198.50));
        assert_eq!(f64_field(&data, "b"), Some(42.0));
        assert_eq!(f64_field(&data, "c"), None);
        assert_eq!(f64_field(&data, "d"), None);
        assert_eq!(f64_field(&data, "missing"), None);
    }

    #[test]
    fn strings_reject_empty_values() {
        let data = json!({"name": "Apple Inc", "blank": "  ", "num": 7});
        assert_eq!(str_field(&data, "name").as_deref(), Some("Apple Inc"));
        assert_eq!(str_field(&data, "blank"), None);
        assert_eq!(str_field(&data, "num").as_deref(), Some("7"));
    }

    #[test]
    fn parses_supported_datetime_shapes() {
        assert!(parse_datetime("2025-04-11 09:00:00").is_some());
        assert!(parse_datetime("2025-04-11T09:00:00Z").is_some());
        assert!(parse_datetime("2025-04-11").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn bools_accept_vendor_spellings() {
        let data = json!({"a": true, "b": "Yes", "c": "0", "d": 1});
        assert_eq!(bool_field(&data, "a"), Some(true));
        assert_eq!(bool_field(&data, "b"), Some(true));
        assert_eq!(bool_field(&data, "c"), Some(false));
        assert_eq!(bool_field(&data, "d"), Some(true));
    }
}
