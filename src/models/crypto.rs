use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::symbol::map_listing;
use crate::models::ParseError;

/// A tradable cryptocurrency pair, e.g. `BTC/USD`.
#[derive(Debug, Clone, Serialize)]
pub struct CryptoPair {
    pub symbol: String,
    pub currency_base: String,
    pub currency_quote: String,
    pub available_exchanges: Vec<String>,
}

impl CryptoPair {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        let (sym_base, sym_quote) = match symbol.split_once('/') {
            Some((b, q)) => (Some(b.to_string()), Some(q.to_string())),
            None => (None, None),
        };
        Ok(CryptoPair {
            currency_base: field::str_field(data, "currency_base")
                .or(sym_base)
                .unwrap_or_default(),
            currency_quote: field::str_field(data, "currency_quote")
                .or(sym_quote)
                .unwrap_or_default(),
            available_exchanges: exchanges_list(data.get("available_exchanges")),
            symbol,
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<CryptoPair> {
        map_listing(data, "crypto pair", CryptoPair::from_response)
    }
}

// The vendor sends this as a JSON list or one comma-joined string.
fn exchanges_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// A venue that trades cryptocurrencies.
#[derive(Debug, Clone, Serialize)]
pub struct CryptoExchange {
    pub name: String,
}

impl CryptoExchange {
    pub fn list_from_response(data: &Value) -> Vec<CryptoExchange> {
        let Some(items) = field::data_array(data) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(CryptoExchange { name: s.clone() }),
                Value::Object(_) => field::str_field(item, "name").map(|name| CryptoExchange { name }),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_exchange_list() {
        let pair = CryptoPair::from_response(&json!({
            "symbol": "BTC/USD",
            "available_exchanges": ["Binance", "Coinbase Pro"]
        }))
        .unwrap();
        assert_eq!(pair.currency_base, "BTC");
        assert_eq!(pair.available_exchanges.len(), 2);
    }

    #[test]
    fn accepts_comma_joined_exchanges() {
        let pair = CryptoPair::from_response(&json!({
            "symbol": "ETH/USD",
            "available_exchanges": "Binance, Kraken ,Coinbase"
        }))
        .unwrap();
        assert_eq!(
            pair.available_exchanges,
            vec!["Binance".to_string(), "Kraken".to_string(), "Coinbase".to_string()]
        );
    }

    #[test]
    fn maps_exchange_names_from_either_shape() {
        let exchanges =
            CryptoExchange::list_from_response(&json!({"data": ["Binance", {"name": "Kraken"}]}));
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[1].name, "Kraken");
    }
}
