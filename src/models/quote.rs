use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::models::field;
use crate::models::ParseError;

/// A real-time quote for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub currency: String,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

impl Quote {
    /// Build a quote from one vendor object.
    ///
    /// `symbol` and a price (under `close` or `price`) are required; every
    /// other field degrades to a default when absent or malformed.
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        let price = field::f64_field(data, "close")
            .or_else(|| field::f64_field(data, "price"))
            .ok_or(ParseError::MissingField("close"))?;

        let (ftw_high, ftw_low) = fifty_two_week(data);

        Ok(Quote {
            symbol,
            name: field::str_field(data, "name"),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            price,
            change: field::f64_field(data, "change")
                .or_else(|| field::f64_field(data, "price_change"))
                .unwrap_or(0.0),
            percent_change: field::f64_field(data, "percent_change")
                .or_else(|| field::f64_field(data, "change_percentage"))
                .unwrap_or(0.0),
            volume: field::u64_field(data, "volume"),
            open: field::f64_field(data, "open"),
            high: field::f64_field(data, "high"),
            low: field::f64_field(data, "low"),
            previous_close: field::f64_field(data, "previous_close"),
            fifty_two_week_high: ftw_high,
            fifty_two_week_low: ftw_low,
            timestamp: field::datetime_field(data, "datetime"),
        })
    }

    pub fn is_gain(&self) -> bool {
        self.change >= 0.0
    }
}

// 52-week range arrives flat or nested under "fifty_two_week".
fn fifty_two_week(data: &Value) -> (Option<f64>, Option<f64>) {
    if let Some(nested) = data.get("fifty_two_week") {
        return (
            field::f64_field(nested, "high"),
            field::f64_field(nested, "low"),
        );
    }
    (
        field::f64_field(data, "fifty_two_week_high"),
        field::f64_field(data, "fifty_two_week_low"),
    )
}

/// Result of mapping a (possibly multi-symbol) quote response.
#[derive(Debug, Default)]
pub struct QuoteBatch {
    pub quotes: Vec<Quote>,
    pub failed: Vec<String>,
}

impl QuoteBatch {
    /// Map a quote payload that is either a single object or an object keyed
    /// by symbol. Entries that are vendor error stubs or fail to parse are
    /// skipped with a warning and reported in `failed`.
    pub fn from_response(data: &Value, requested: &[String]) -> Self {
        let mut batch = QuoteBatch::default();

        let Some(obj) = data.as_object() else {
            warn!("Quote response is not an object; no valid quotes found");
            batch.failed = requested.to_vec();
            return batch;
        };

        if obj.contains_key("symbol") || obj.contains_key("close") {
            // Single-symbol shape.
            match Quote::from_response(data) {
                Ok(quote) => batch.quotes.push(quote),
                Err(e) => {
                    warn!("Skipping unparseable quote: {}", e);
                    batch.failed = requested.to_vec();
                }
            }
            return batch;
        }

        for (key, entry) in obj {
            if entry
                .get("status")
                .and_then(Value::as_str)
                .map(|s| s == "error")
                .unwrap_or(false)
            {
                let message = entry
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                warn!("API error for symbol {}: {}", key, message);
                batch.failed.push(key.clone());
                continue;
            }
            match Quote::from_response(entry) {
                Ok(quote) => batch.quotes.push(quote),
                Err(e) => {
                    warn!("Skipping quote for {}: {}", key, e);
                    batch.failed.push(key.clone());
                }
            }
        }

        if batch.quotes.is_empty() && batch.failed.is_empty() {
            batch.failed = requested.to_vec();
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_single_quote() -> Value {
        json!({
            "symbol": "AAPL",
            "name": "Apple Inc",
            "currency": "USD",
            "close": "198.53",
            "change": "2.31",
            "percent_change": "1.18",
            "volume": "54321000",
            "open": "196.10",
            "high": "199.62",
            "low": "195.89",
            "previous_close": "196.22",
            "fifty_two_week": {"high": "237.23", "low": "164.08"},
            "datetime": "2025-04-11 09:00:00"
        })
    }

    #[test]
    fn maps_a_full_quote() {
        let quote = Quote::from_response(&sample_single_quote()).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.name.as_deref(), Some("Apple Inc"));
        assert_eq!(quote.price, 198.53);
        assert_eq!(quote.change, 2.31);
        assert_eq!(quote.percent_change, 1.18);
        assert_eq!(quote.volume, Some(54_321_000));
        assert_eq!(quote.fifty_two_week_high, Some(237.23));
        assert_eq!(quote.fifty_two_week_low, Some(164.08));
        assert!(quote.timestamp.is_some());
        assert!(quote.is_gain());
    }

    #[test]
    fn accepts_alternate_field_names() {
        let data = json!({
            "symbol": "MSFT",
            "price": 410.0,
            "price_change": "-1.5",
            "change_percentage": "-0.36"
        });
        let quote = Quote::from_response(&data).unwrap();
        assert_eq!(quote.price, 410.0);
        assert_eq!(quote.change, -1.5);
        assert_eq!(quote.percent_change, -0.36);
        assert_eq!(quote.currency, "USD");
        assert!(!quote.is_gain());
    }

    #[test]
    fn missing_price_is_an_error() {
        let data = json!({"symbol": "AAPL", "change": "1.0"});
        assert!(matches!(
            Quote::from_response(&data),
            Err(ParseError::MissingField("close"))
        ));
    }

    #[test]
    fn batch_maps_symbol_keyed_response() {
        let data = json!({
            "AAPL": sample_single_quote(),
            "MSFT": {"symbol": "MSFT", "close": "410.00"}
        });
        let batch = QuoteBatch::from_response(&data, &["AAPL".into(), "MSFT".into()]);
        assert_eq!(batch.quotes.len(), 2);
        assert!(batch.failed.is_empty());
    }

    #[test]
    fn batch_skips_per_symbol_errors() {
        let data = json!({
            "AAPL": sample_single_quote(),
            "BAD": {"status": "error", "code": 400, "message": "symbol not found"}
        });
        let batch = QuoteBatch::from_response(&data, &["AAPL".into(), "BAD".into()]);
        assert_eq!(batch.quotes.len(), 1);
        assert_eq!(batch.failed, vec!["BAD".to_string()]);
    }

    #[test]
    fn malformed_body_yields_no_quotes() {
        let batch = QuoteBatch::from_response(&json!("not a quote"), &["AAPL".into()]);
        assert!(batch.quotes.is_empty());
        assert_eq!(batch.failed, vec!["AAPL".to_string()]);
    }
}
