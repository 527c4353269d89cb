use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::ParseError;

/// Consensus growth rate estimates for one symbol, in percent.
///
/// The vendor sends these in several shapes ("5.2", 5.2, "5.2%", "NA");
/// anything unparseable comes through as `None`.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthEstimates {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub currency: String,
    pub current_quarter: Option<f64>,
    pub next_quarter: Option<f64>,
    pub current_year: Option<f64>,
    pub next_year: Option<f64>,
    pub next_five_years: Option<f64>,
    pub past_five_years: Option<f64>,
    pub sales_growth_current_quarter: Option<f64>,
    pub sales_growth_current_year: Option<f64>,
    pub eps_growth_current_quarter: Option<f64>,
    pub eps_growth_next_quarter: Option<f64>,
    pub eps_growth_current_year: Option<f64>,
    pub eps_growth_next_year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl GrowthEstimates {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        Ok(GrowthEstimates {
            symbol,
            name: field::str_field(data, "name"),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            current_quarter: growth_value(data.get("current_quarter_growth_estimate")),
            next_quarter: growth_value(data.get("next_quarter_growth_estimate")),
            current_year: growth_value(data.get("current_year_growth_estimate")),
            next_year: growth_value(data.get("next_year_growth_estimate")),
            next_five_years: growth_value(data.get("next_5_years_growth_estimate")),
            past_five_years: growth_value(data.get("past_5_years_growth_rate")),
            sales_growth_current_quarter: growth_value(
                data.get("current_quarter_sales_growth_estimate"),
            ),
            sales_growth_current_year: growth_value(
                data.get("current_year_sales_growth_estimate"),
            ),
            eps_growth_current_quarter: growth_value(
                data.get("current_quarter_eps_growth_estimate"),
            ),
            eps_growth_next_quarter: growth_value(data.get("next_quarter_eps_growth_estimate")),
            eps_growth_current_year: growth_value(data.get("current_year_eps_growth_estimate")),
            eps_growth_next_year: growth_value(data.get("next_year_eps_growth_estimate")),
            last_updated: field::str_field(data, "last_updated"),
        })
    }

    /// True when no growth field parsed at all.
    pub fn is_empty(&self) -> bool {
        [
            self.current_quarter,
            self.next_quarter,
            self.current_year,
            self.next_year,
            self.next_five_years,
            self.past_five_years,
            self.sales_growth_current_quarter,
            self.sales_growth_current_year,
            self.eps_growth_current_quarter,
            self.eps_growth_next_quarter,
            self.eps_growth_current_year,
            self.eps_growth_next_year,
        ]
        .iter()
        .all(Option::is_none)
    }
}

fn growth_value(raw: Option<&Value>) -> Option<f64> {
    let raw = raw?;
    if let Some(n) = raw.as_f64() {
        return Some(n);
    }
    let text = raw.as_str()?.trim().trim_end_matches('%').trim();
    if text.is_empty() || text.eq_ignore_ascii_case("NA") || text.eq_ignore_ascii_case("N/A") {
        return None;
    }
    text.parse().ok()
}

/// Render a growth rate for display, `"N/A"` when absent.
pub fn format_growth(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.2}%"),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_percent_strings_and_numbers() {
        assert_eq!(growth_value(Some(&json!("5.2%"))), Some(5.2));
        assert_eq!(growth_value(Some(&json!("-3.1"))), Some(-3.1));
        assert_eq!(growth_value(Some(&json!(7.5))), Some(7.5));
        assert_eq!(growth_value(Some(&json!(""))), None);
        assert_eq!(growth_value(Some(&json!("NA"))), None);
        assert_eq!(growth_value(Some(&json!("N/A"))), None);
        assert_eq!(growth_value(None), None);
    }

    #[test]
    fn maps_vendor_keys() {
        let growth = GrowthEstimates::from_response(&json!({
            "symbol": "AAPL",
            "current_quarter_growth_estimate": "8.4%",
            "next_5_years_growth_estimate": "10.1",
            "past_5_years_growth_rate": "15.73",
            "current_year_eps_growth_estimate": "NA"
        }))
        .unwrap();
        assert_eq!(growth.current_quarter, Some(8.4));
        assert_eq!(growth.next_five_years, Some(10.1));
        assert_eq!(growth.past_five_years, Some(15.73));
        assert_eq!(growth.eps_growth_current_year, None);
        assert!(!growth.is_empty());
    }

    #[test]
    fn empty_payload_is_empty() {
        let growth = GrowthEstimates::from_response(&json!({"symbol": "X"})).unwrap();
        assert!(growth.is_empty());
    }

    #[test]
    fn formats_with_sign() {
        assert_eq!(format_growth(Some(8.4)), "+8.40%");
        assert_eq!(format_growth(Some(-3.0)), "-3.00%");
        assert_eq!(format_growth(None), "N/A");
    }
}
