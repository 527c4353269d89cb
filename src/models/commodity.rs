use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::symbol::map_listing;
use crate::models::ParseError;

const PRECIOUS_METALS: &[&str] = &["XAU", "XAG", "XPT", "XPD", "GOLD", "SILVER"];
const ENERGY: &[&str] = &["CL", "NG", "BRENT", "WTI", "OIL", "GAS"];
const AGRICULTURE: &[&str] = &[
    "ZC", "ZW", "ZS", "CORN", "WHEAT", "SOYBEAN", "COTTON", "SUGAR", "COFFEE", "COCOA",
];
const INDUSTRIAL_METALS: &[&str] = &["HG", "COPPER", "ALU", "ALUMINIUM", "ZINC", "NICKEL"];

/// A commodity trading pair, e.g. `XAU/USD`.
#[derive(Debug, Clone, Serialize)]
pub struct CommodityPair {
    pub symbol: String,
    pub base_commodity: String,
    pub quote_currency: String,
    pub available_exchanges: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodity_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_description: Option<String>,
}

impl CommodityPair {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        let (base, quote) = split_symbol(&symbol);

        let available_exchanges = match data.get("available_exchanges") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(String::from)
                .collect(),
            Some(Value::String(one)) => vec![one.clone()],
            _ => Vec::new(),
        };

        Ok(CommodityPair {
            commodity_group: field::str_field(data, "commodity_group")
                .or_else(|| classify_group(&base).map(String::from)),
            base_commodity: base,
            quote_currency: quote,
            available_exchanges,
            is_active: field::bool_field(data, "is_active").unwrap_or(true),
            symbol_description: field::str_field(data, "symbol_description"),
            symbol,
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<CommodityPair> {
        map_listing(data, "commodity pair", CommodityPair::from_response)
    }
}

// Symbols arrive as "XAU/USD" or collapsed like "XAUUSD".
fn split_symbol(symbol: &str) -> (String, String) {
    if let Some((base, quote)) = symbol.split_once('/') {
        return (base.to_string(), quote.to_string());
    }
    if ["XAU", "XAG", "XPD", "XPT"]
        .iter()
        .any(|p| symbol.starts_with(p))
    {
        return (symbol[..3].to_string(), symbol[3..].to_string());
    }
    if symbol.len() > 3 && ["USD", "EUR", "GBP"].iter().any(|s| symbol.ends_with(s)) {
        return (
            symbol[..symbol.len() - 3].to_string(),
            symbol[symbol.len() - 3..].to_string(),
        );
    }
    (symbol.to_string(), String::new())
}

fn classify_group(base: &str) -> Option<&'static str> {
    if PRECIOUS_METALS.contains(&base) {
        Some("precious_metals")
    } else if ENERGY.contains(&base) {
        Some("energy")
    } else if AGRICULTURE.contains(&base) {
        Some("agriculture")
    } else if INDUSTRIAL_METALS.contains(&base) {
        Some("industrial_metals")
    } else {
        None
    }
}

/// A named commodity group with example symbols.
#[derive(Debug, Clone, Serialize)]
pub struct CommodityGroup {
    pub name: String,
    pub description: String,
    pub examples: Vec<String>,
}

impl CommodityGroup {
    /// The fixed set of groups the listing commands know about.
    pub fn all() -> Vec<CommodityGroup> {
        vec![
            CommodityGroup {
                name: "precious_metals".to_string(),
                description: "Gold, silver, platinum and palladium".to_string(),
                examples: PRECIOUS_METALS.iter().map(|s| s.to_string()).collect(),
            },
            CommodityGroup {
                name: "energy".to_string(),
                description: "Crude oil, natural gas and refined products".to_string(),
                examples: ENERGY.iter().map(|s| s.to_string()).collect(),
            },
            CommodityGroup {
                name: "agriculture".to_string(),
                description: "Grains, softs and other agricultural products".to_string(),
                examples: AGRICULTURE.iter().map(|s| s.to_string()).collect(),
            },
            CommodityGroup {
                name: "industrial_metals".to_string(),
                description: "Copper, aluminium and other base metals".to_string(),
                examples: INDUSTRIAL_METALS.iter().map(|s| s.to_string()).collect(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_slash_symbols() {
        let pair = CommodityPair::from_response(&json!({"symbol": "XAU/USD"})).unwrap();
        assert_eq!(pair.base_commodity, "XAU");
        assert_eq!(pair.quote_currency, "USD");
        assert_eq!(pair.commodity_group.as_deref(), Some("precious_metals"));
    }

    #[test]
    fn splits_collapsed_symbols_by_prefix_and_suffix() {
        let gold = CommodityPair::from_response(&json!({"symbol": "XAGUSD"})).unwrap();
        assert_eq!(gold.base_commodity, "XAG");
        assert_eq!(gold.quote_currency, "USD");

        let oil = CommodityPair::from_response(&json!({"symbol": "WTIUSD"})).unwrap();
        assert_eq!(oil.base_commodity, "WTI");
        assert_eq!(oil.commodity_group.as_deref(), Some("energy"));
    }

    #[test]
    fn unknown_symbol_keeps_whole_base() {
        let pair = CommodityPair::from_response(&json!({"symbol": "FOO"})).unwrap();
        assert_eq!(pair.base_commodity, "FOO");
        assert_eq!(pair.quote_currency, "");
        assert!(pair.commodity_group.is_none());
    }

    #[test]
    fn vendor_group_overrides_classification() {
        let pair = CommodityPair::from_response(
            &json!({"symbol": "XAU/USD", "commodity_group": "metals"}),
        )
        .unwrap();
        assert_eq!(pair.commodity_group.as_deref(), Some("metals"));
    }

    #[test]
    fn single_exchange_string_becomes_list() {
        let pair = CommodityPair::from_response(
            &json!({"symbol": "XAU/USD", "available_exchanges": "COMEX"}),
        )
        .unwrap();
        assert_eq!(pair.available_exchanges, vec!["COMEX".to_string()]);
    }
}
