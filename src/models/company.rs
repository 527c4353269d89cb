use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::ParseError;

/// Company profile and key metrics for one symbol.
///
/// Identification fields sit at the top level; the detail block arrives
/// under `profile`, or under `meta` on some plans.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to_book: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,
}

impl CompanyProfile {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;

        let detail = data
            .get("profile")
            .filter(|v| v.is_object())
            .or_else(|| data.get("meta").filter(|v| v.is_object()))
            .unwrap_or(&Value::Null);

        Ok(CompanyProfile {
            symbol,
            name: field::str_field(data, "name").unwrap_or_default(),
            exchange: field::str_field(data, "exchange").unwrap_or_default(),
            country: field::str_field(data, "country").unwrap_or_default(),
            sector: field::str_field(detail, "sector"),
            industry: field::str_field(detail, "industry"),
            description: field::str_field(detail, "description"),
            website: field::str_field(detail, "website"),
            employees: field::u64_field(detail, "employees"),
            market_cap: field::f64_field(detail, "market_cap"),
            pe_ratio: field::f64_field(detail, "pe_ratio"),
            price_to_book: field::f64_field(detail, "price_to_book"),
            dividend_yield: field::f64_field(detail, "dividend_yield"),
            fifty_two_week_high: field::f64_field(detail, "52_week_high"),
            fifty_two_week_low: field::f64_field(detail, "52_week_low"),
            ceo: field::str_field(detail, "ceo"),
            founded_year: field::u64_field(detail, "founded_year").map(|y| y as u32),
            headquarters: field::str_field(detail, "headquarters"),
        })
    }

    /// Description capped at 500 characters for table display.
    pub fn short_description(&self) -> Option<String> {
        self.description.as_ref().map(|text| {
            if text.chars().count() <= 500 {
                text.clone()
            } else {
                let truncated: String = text.chars().take(497).collect();
                format!("{truncated}...")
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_detail_from_profile_block() {
        let profile = CompanyProfile::from_response(&json!({
            "symbol": "AAPL",
            "name": "Apple Inc",
            "exchange": "NASDAQ",
            "country": "United States",
            "profile": {
                "sector": "Technology",
                "industry": "Consumer Electronics",
                "employees": "164000",
                "market_cap": "3700000000000",
                "pe_ratio": "34.2",
                "52_week_high": "260.1",
                "52_week_low": "164.08",
                "ceo": "Tim Cook"
            }
        }))
        .unwrap();
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.employees, Some(164_000));
        assert_eq!(profile.fifty_two_week_high, Some(260.1));
        assert_eq!(profile.ceo.as_deref(), Some("Tim Cook"));
    }

    #[test]
    fn falls_back_to_meta_block() {
        let profile = CompanyProfile::from_response(&json!({
            "symbol": "AAPL",
            "meta": {"sector": "Technology"}
        }))
        .unwrap();
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
    }

    #[test]
    fn truncates_long_descriptions() {
        let long = "x".repeat(600);
        let profile = CompanyProfile::from_response(&json!({
            "symbol": "AAPL",
            "profile": {"description": long}
        }))
        .unwrap();
        let short = profile.short_description().unwrap();
        assert_eq!(short.chars().count(), 500);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn requires_symbol() {
        assert!(CompanyProfile::from_response(&json!({"name": "Apple"})).is_err());
    }
}
