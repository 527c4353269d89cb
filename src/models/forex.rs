use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::symbol::map_listing;
use crate::models::ParseError;

/// A tradable forex pair, e.g. `EUR/USD`.
#[derive(Debug, Clone, Serialize)]
pub struct ForexPair {
    pub symbol: String,
    pub currency_base: String,
    pub currency_quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ForexPair {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        // Base/quote fall back to the two halves of the symbol.
        let (sym_base, sym_quote) = match symbol.split_once('/') {
            Some((b, q)) => (Some(b.to_string()), Some(q.to_string())),
            None => (None, None),
        };
        Ok(ForexPair {
            currency_base: field::str_field(data, "currency_base")
                .or(sym_base)
                .unwrap_or_default(),
            currency_quote: field::str_field(data, "currency_quote")
                .or(sym_quote)
                .unwrap_or_default(),
            name: field::str_field(data, "name"),
            symbol,
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<ForexPair> {
        map_listing(data, "forex pair", ForexPair::from_response)
    }
}

/// A physical currency.
#[derive(Debug, Clone, Serialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Currency {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let code = field::str_field(data, "code")
            .or_else(|| field::str_field(data, "currency"))
            .ok_or(ParseError::MissingField("code"))?;
        Ok(Currency {
            code,
            name: field::str_field(data, "name")
                .or_else(|| field::str_field(data, "currency_name"))
                .unwrap_or_default(),
            country: field::str_field(data, "country"),
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<Currency> {
        map_listing(data, "currency", Currency::from_response)
    }
}

/// A spot conversion rate between two currencies.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeRate {
    pub symbol: String,
    pub rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

impl ExchangeRate {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        let rate = field::f64_field(data, "rate").ok_or(ParseError::MissingField("rate"))?;
        let timestamp = field::i64_field(data, "timestamp")
            .and_then(|t| chrono::DateTime::from_timestamp(t, 0))
            .map(|dt| dt.naive_utc())
            .or_else(|| field::datetime_field(data, "timestamp"));
        Ok(ExchangeRate {
            symbol,
            rate,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pair_derives_base_and_quote_from_symbol() {
        let pair = ForexPair::from_response(&json!({"symbol": "EUR/USD"})).unwrap();
        assert_eq!(pair.currency_base, "EUR");
        assert_eq!(pair.currency_quote, "USD");
    }

    #[test]
    fn explicit_base_and_quote_win() {
        let pair = ForexPair::from_response(&json!({
            "symbol": "EUR/USD",
            "currency_base": "Euro",
            "currency_quote": "US Dollar"
        }))
        .unwrap();
        assert_eq!(pair.currency_base, "Euro");
        assert_eq!(pair.currency_quote, "US Dollar");
    }

    #[test]
    fn rate_accepts_unix_timestamp() {
        let rate = ExchangeRate::from_response(&json!({
            "symbol": "USD/JPY",
            "rate": 151.42,
            "timestamp": 1744362000
        }))
        .unwrap();
        assert_eq!(rate.rate, 151.42);
        assert!(rate.timestamp.is_some());
    }

    #[test]
    fn rate_requires_a_rate() {
        assert!(ExchangeRate::from_response(&json!({"symbol": "USD/JPY"})).is_err());
    }
}
