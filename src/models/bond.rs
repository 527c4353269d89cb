use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::symbol::map_listing;
use crate::models::ParseError;

/// A bond listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct Bond {
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub exchange: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub instrument_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_callable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_to_maturity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mic_code: Option<String>,
}

impl Bond {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        Ok(Bond {
            symbol,
            name: field::str_field(data, "name").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_default(),
            exchange: field::str_field(data, "exchange").unwrap_or_default(),
            country: field::str_field(data, "country"),
            instrument_type: field::str_field(data, "type").unwrap_or_else(|| "bond".to_string()),
            bond_type: field::str_field(data, "bond_type"),
            issuer: field::str_field(data, "issuer"),
            maturity_date: field::str_field(data, "maturity_date"),
            coupon_rate: field::f64_field(data, "coupon_rate"),
            face_value: field::f64_field(data, "face_value"),
            credit_rating: field::str_field(data, "credit_rating"),
            is_callable: field::bool_field(data, "is_callable"),
            yield_to_maturity: field::f64_field(data, "yield_to_maturity"),
            mic_code: field::str_field(data, "mic_code"),
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<Bond> {
        map_listing(data, "bond", Bond::from_response)
    }

    /// Loose government/corporate classification used by the subcommands.
    pub fn is_government(&self) -> bool {
        let haystack = format!(
            "{} {} {}",
            self.bond_type.as_deref().unwrap_or(""),
            self.issuer.as_deref().unwrap_or(""),
            self.name
        )
        .to_lowercase();
        ["government", "treasury", "sovereign", "municipal"]
            .iter()
            .any(|kw| haystack.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_bond_detail_fields() {
        let bond = Bond::from_response(&json!({
            "symbol": "US10Y",
            "name": "US Treasury 10 Year Note",
            "currency": "USD",
            "exchange": "OTC",
            "bond_type": "government",
            "issuer": "US Treasury",
            "maturity_date": "2035-05-15",
            "coupon_rate": "4.25",
            "face_value": 1000,
            "credit_rating": "AAA",
            "is_callable": false,
            "yield_to_maturity": "4.31"
        }))
        .unwrap();
        assert_eq!(bond.coupon_rate, Some(4.25));
        assert_eq!(bond.face_value, Some(1000.0));
        assert_eq!(bond.is_callable, Some(false));
        assert!(bond.is_government());
    }

    #[test]
    fn null_numerics_stay_none() {
        let bond = Bond::from_response(&json!({
            "symbol": "XYZ",
            "coupon_rate": null,
            "face_value": "n/a"
        }))
        .unwrap();
        assert!(bond.coupon_rate.is_none());
        assert!(bond.face_value.is_none());
        assert!(!bond.is_government());
    }
}
