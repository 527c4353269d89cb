use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::symbol::map_listing;
use crate::models::ParseError;

/// An exchange-traded fund.
#[derive(Debug, Clone, Serialize)]
pub struct Etf {
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub exchange: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub instrument_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_assets: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inception_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mic_code: Option<String>,
}

/// Sortable columns for ETF listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EtfSortKey {
    Symbol,
    ExpenseRatio,
    ManagedAssets,
    DividendYield,
}

impl Etf {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        Ok(Etf {
            symbol,
            name: field::str_field(data, "name").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_default(),
            exchange: field::str_field(data, "exchange").unwrap_or_default(),
            country: field::str_field(data, "country"),
            instrument_type: field::str_field(data, "type").unwrap_or_else(|| "etf".to_string()),
            asset_class: field::str_field(data, "asset_class"),
            expense_ratio: field::f64_field(data, "expense_ratio"),
            managed_assets: field::f64_field(data, "managed_assets"),
            fund_family: field::str_field(data, "fund_family"),
            nav: field::f64_field(data, "nav"),
            category: field::str_field(data, "category"),
            benchmark: field::str_field(data, "benchmark"),
            description: field::str_field(data, "description"),
            inception_date: field::str_field(data, "inception_date"),
            dividend_yield: field::f64_field(data, "dividend_yield"),
            mic_code: field::str_field(data, "mic_code"),
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<Etf> {
        map_listing(data, "etf", Etf::from_response)
    }

    /// Description capped for CSV rows.
    pub fn short_description(&self) -> String {
        let desc = self.description.as_deref().unwrap_or("");
        desc.chars().take(100).collect()
    }

    /// Sort a listing in place; records missing the sort value go last.
    pub fn sort_by_key(etfs: &mut [Etf], key: EtfSortKey, descending: bool) {
        etfs.sort_by(|a, b| {
            let ord = match key {
                EtfSortKey::Symbol => a.symbol.cmp(&b.symbol),
                EtfSortKey::ExpenseRatio => cmp_optional(a.expense_ratio, b.expense_ratio),
                EtfSortKey::ManagedAssets => cmp_optional(a.managed_assets, b.managed_assets),
                EtfSortKey::DividendYield => cmp_optional(a.dividend_yield, b.dividend_yield),
            };
            if descending { ord.reverse() } else { ord }
        });
    }
}

fn cmp_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn etf(symbol: &str, expense: Option<f64>) -> Etf {
        let mut data = json!({"symbol": symbol});
        if let Some(e) = expense {
            data["expense_ratio"] = json!(e.to_string());
        }
        Etf::from_response(&data).unwrap()
    }

    #[test]
    fn sorts_with_missing_values_last() {
        let mut etfs = vec![etf("A", Some(0.2)), etf("B", None), etf("C", Some(0.03))];
        Etf::sort_by_key(&mut etfs, EtfSortKey::ExpenseRatio, false);
        let order: Vec<&str> = etfs.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn descending_reverses_order() {
        let mut etfs = vec![etf("A", Some(0.2)), etf("C", Some(0.03))];
        Etf::sort_by_key(&mut etfs, EtfSortKey::ExpenseRatio, true);
        assert_eq!(etfs[0].symbol, "A");
    }

    #[test]
    fn caps_description_for_csv() {
        let mut data = json!({"symbol": "SPY"});
        data["description"] = json!("x".repeat(250));
        let etf = Etf::from_response(&data).unwrap();
        assert_eq!(etf.short_description().len(), 100);
    }
}
