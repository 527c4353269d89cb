use serde::Serialize;
use serde_json::Value;

use crate::models::field;

/// One entry in the daily gainers or losers ranking.
#[derive(Debug, Clone, Serialize)]
pub struct MarketMover {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl MarketMover {
    fn from_response(data: &Value) -> Option<Self> {
        let symbol = field::str_field(data, "symbol")?;
        Some(MarketMover {
            symbol,
            name: field::str_field(data, "name"),
            exchange: field::str_field(data, "exchange"),
            price: field::f64_field(data, "last")
                .or_else(|| field::f64_field(data, "price"))
                .unwrap_or(0.0),
            change: field::f64_field(data, "change").unwrap_or(0.0),
            percent_change: field::f64_field(data, "percent_change").unwrap_or(0.0),
            volume: field::u64_field(data, "volume"),
        })
    }

    pub fn is_gain(&self) -> bool {
        self.change >= 0.0
    }

    /// List from a `values`-wrapped payload or a bare array; entries
    /// without a symbol are dropped.
    pub fn list_from_response(data: &Value) -> Vec<MarketMover> {
        data.get("values")
            .and_then(Value::as_array)
            .or_else(|| data.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(MarketMover::from_response)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_values_wrapper_and_drops_symbolless_entries() {
        let movers = MarketMover::list_from_response(&json!({"values": [
            {"symbol": "SMCI", "name": "Super Micro", "exchange": "NASDAQ",
             "last": "44.12", "change": "5.87", "percent_change": "15.35",
             "volume": "81234567"},
            {"name": "no symbol here"}
        ]}));
        assert_eq!(movers.len(), 1);
        assert_eq!(movers[0].symbol, "SMCI");
        assert_eq!(movers[0].price, 44.12);
        assert!(movers[0].is_gain());
    }

    #[test]
    fn accepts_price_key_and_bare_arrays() {
        let movers = MarketMover::list_from_response(&json!([
            {"symbol": "XYZ", "price": "10.5", "change": "-1.2", "percent_change": "-10.26"}
        ]));
        assert_eq!(movers.len(), 1);
        assert_eq!(movers[0].price, 10.5);
        assert!(!movers[0].is_gain());
    }
}
