use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::symbol::map_listing;
use crate::models::ParseError;

/// A fund listing entry (ETF or mutual fund).
#[derive(Debug, Clone, Serialize)]
pub struct Fund {
    pub symbol: String,
    pub name: String,
    pub fund_type: String,
    pub currency: String,
    pub exchange: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mic_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fund_category: Option<String>,
}

impl Fund {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        // Profile-style payloads carry the fund details in a meta subobject.
        let meta = data.get("meta");
        Ok(Fund {
            symbol,
            name: field::str_field(data, "name").unwrap_or_default(),
            fund_type: field::str_field(data, "type").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_default(),
            exchange: field::str_field(data, "exchange").unwrap_or_default(),
            country: field::str_field(data, "country").unwrap_or_default(),
            isin: field::str_field(data, "isin"),
            mic_code: field::str_field(data, "mic_code"),
            asset_class: meta.and_then(|m| field::str_field(m, "asset_class")),
            expense_ratio: meta.and_then(|m| field::f64_field(m, "expense_ratio")),
            fund_family: meta.and_then(|m| {
                field::str_field(m, "fund_family").or_else(|| field::str_field(m, "issuer"))
            }),
            fund_category: meta.and_then(|m| field::str_field(m, "category")),
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<Fund> {
        map_listing(data, "fund", Fund::from_response)
    }
}

/// Mutual fund profile: a fund plus the detail fields from the vendor's
/// `meta` subobject.
#[derive(Debug, Clone, Serialize)]
pub struct MutualFundProfile {
    #[serde(flatten)]
    pub fund: Fund,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inception_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_expense_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_expense_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_investment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover_ratio: Option<f64>,
    #[serde(rename = "yield", skip_serializing_if = "Option::is_none")]
    pub yield_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morningstar_rating: Option<u8>,
}

impl MutualFundProfile {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let mut fund = Fund::from_response(data)?;
        if fund.fund_type.is_empty() {
            fund.fund_type = "mutual_fund".to_string();
        }
        let meta = data.get("meta").cloned().unwrap_or(Value::Null);
        Ok(MutualFundProfile {
            fund,
            inception_date: field::date_field(&meta, "inception_date"),
            investment_objective: field::str_field(&meta, "investment_objective"),
            total_assets: field::f64_field(&meta, "total_assets"),
            net_expense_ratio: field::f64_field(&meta, "net_expense_ratio"),
            gross_expense_ratio: field::f64_field(&meta, "gross_expense_ratio"),
            management_fee: field::f64_field(&meta, "management_fee"),
            minimum_investment: field::f64_field(&meta, "minimum_investment"),
            turnover_ratio: field::f64_field(&meta, "turnover_ratio"),
            yield_percentage: field::f64_field(&meta, "yield"),
            morningstar_rating: field::u64_field(&meta, "morningstar_rating").map(|r| r.min(5) as u8),
        })
    }

    /// Rating rendered as filled stars, e.g. `★★★★`.
    pub fn rating_stars(&self) -> String {
        "★".repeat(self.morningstar_rating.unwrap_or(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_profile() -> Value {
        json!({
            "symbol": "VTSAX",
            "name": "Vanguard Total Stock Market Index Fund",
            "currency": "USD",
            "exchange": "NASDAQ",
            "country": "United States",
            "meta": {
                "fund_family": "Vanguard",
                "category": "Large Blend",
                "inception_date": "2000-11-13",
                "investment_objective": "Track the CRSP US Total Market Index",
                "total_assets": "1300000000000",
                "net_expense_ratio": "0.04",
                "gross_expense_ratio": "0.04",
                "minimum_investment": "3000",
                "turnover_ratio": "2.2",
                "yield": "1.38",
                "morningstar_rating": 4
            }
        })
    }

    #[test]
    fn maps_profile_meta_fields() {
        let profile = MutualFundProfile::from_response(&sample_profile()).unwrap();
        assert_eq!(profile.fund.symbol, "VTSAX");
        assert_eq!(profile.fund.fund_family.as_deref(), Some("Vanguard"));
        assert_eq!(profile.fund.fund_type, "mutual_fund");
        assert_eq!(profile.inception_date.unwrap().to_string(), "2000-11-13");
        assert_eq!(profile.net_expense_ratio, Some(0.04));
        assert_eq!(profile.morningstar_rating, Some(4));
        assert_eq!(profile.rating_stars(), "★★★★");
    }

    #[test]
    fn listing_entry_without_meta_is_fine() {
        let fund = Fund::from_response(&json!({
            "symbol": "SPY",
            "name": "SPDR S&P 500 ETF Trust",
            "type": "etf"
        }))
        .unwrap();
        assert!(fund.asset_class.is_none());
        assert_eq!(fund.fund_type, "etf");
    }

    #[test]
    fn bad_inception_date_degrades_to_none() {
        let mut data = sample_profile();
        data["meta"]["inception_date"] = json!("November 2000");
        let profile = MutualFundProfile::from_response(&data).unwrap();
        assert!(profile.inception_date.is_none());
    }
}
