use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::models::field;
use crate::models::ParseError;

/// One tradable instrument from the reference listings.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub exchange: String,
    pub mic_code: String,
    pub country: String,
    pub instrument_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
}

impl Symbol {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        Ok(Symbol {
            symbol,
            name: field::str_field(data, "name").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_default(),
            exchange: field::str_field(data, "exchange").unwrap_or_default(),
            mic_code: field::str_field(data, "mic_code").unwrap_or_default(),
            country: field::str_field(data, "country").unwrap_or_default(),
            instrument_type: field::str_field(data, "type").unwrap_or_default(),
            isin: field::str_field(data, "isin"),
            base_currency: field::str_field(data, "base_currency"),
            access: data
                .get("access")
                .and_then(|a| field::str_field(a, "plan"))
                .or_else(|| field::str_field(data, "access")),
        })
    }

    /// Map a listing payload, skipping entries without a symbol.
    pub fn list_from_response(data: &Value) -> Vec<Symbol> {
        map_listing(data, "symbol", Symbol::from_response)
    }
}

/// An exchange from the reference listings.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub name: String,
    pub code: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Exchange {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let name = field::str_field(data, "name").ok_or(ParseError::MissingField("name"))?;
        Ok(Exchange {
            name,
            code: field::str_field(data, "code").unwrap_or_default(),
            country: field::str_field(data, "country").unwrap_or_default(),
            timezone: field::str_field(data, "timezone"),
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<Exchange> {
        map_listing(data, "exchange", Exchange::from_response)
    }
}

/// Instrument type identifier, e.g. "Common Stock" or "ETF".
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentType {
    pub id: String,
    pub name: String,
}

impl InstrumentType {
    pub fn list_from_response(data: &Value) -> Vec<InstrumentType> {
        let Some(items) = field::data_array(data) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(InstrumentType {
                    id: s.clone(),
                    name: s.clone(),
                }),
                Value::Object(_) => {
                    let name = field::str_field(item, "name")?;
                    Some(InstrumentType {
                        id: field::str_field(item, "id").unwrap_or_else(|| name.clone()),
                        name,
                    })
                }
                _ => None,
            })
            .collect()
    }
}

/// One trading session in an exchange day (e.g. pre-market, regular).
#[derive(Debug, Clone, Serialize)]
pub struct TradingSession {
    pub session: String,
    pub open: String,
    pub close: String,
}

/// Trading hours and venue details for one exchange on one date.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeSchedule {
    pub code: String,
    pub name: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub sessions: Vec<TradingSession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mic_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    pub holidays: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_mic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ExchangeSchedule {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let code = field::str_field(data, "code")
            .or_else(|| field::str_field(data, "exchange"))
            .ok_or(ParseError::MissingField("code"))?;

        let sessions = data
            .get("hours")
            .and_then(Value::as_array)
            .map(|hours| {
                hours
                    .iter()
                    .filter_map(|h| {
                        Some(TradingSession {
                            session: field::str_field(h, "type")
                                .or_else(|| field::str_field(h, "session"))?,
                            open: field::str_field(h, "open").unwrap_or_default(),
                            close: field::str_field(h, "close").unwrap_or_default(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let holidays = data
            .get("holidays")
            .and_then(Value::as_array)
            .map(|hs| hs.iter().filter_map(|h| h.as_str().map(String::from)).collect())
            .unwrap_or_default();

        Ok(ExchangeSchedule {
            code,
            name: field::str_field(data, "name").unwrap_or_default(),
            country: field::str_field(data, "country").unwrap_or_default(),
            timezone: field::str_field(data, "timezone"),
            date: field::str_field(data, "date"),
            sessions,
            suffix: field::str_field(data, "suffix"),
            mic_code: field::str_field(data, "mic_code"),
            currency: field::str_field(data, "currency"),
            is_open: field::bool_field(data, "is_open"),
            holidays,
            operating_mic: field::str_field(data, "operating_mic"),
            website: field::str_field(data, "website"),
        })
    }

    pub fn list_from_response(data: &Value) -> Vec<ExchangeSchedule> {
        map_listing(data, "exchange schedule", ExchangeSchedule::from_response)
    }
}

pub(crate) fn map_listing<T>(
    data: &Value,
    what: &str,
    map: impl Fn(&Value) -> Result<T, ParseError>,
) -> Vec<T> {
    let Some(items) = field::data_array(data) else {
        warn!("Unexpected {} listing shape; nothing to map", what);
        return Vec::new();
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match map(item) {
            Ok(record) => out.push(record),
            Err(e) => warn!("Skipping {} entry: {}", what, e),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_symbol_listing_with_wrapper() {
        let data = json!({
            "data": [
                {"symbol": "AAPL", "name": "Apple Inc", "currency": "USD",
                 "exchange": "NASDAQ", "mic_code": "XNGS", "country": "United States",
                 "type": "Common Stock"},
                {"name": "broken entry"}
            ],
            "status": "ok"
        });
        let symbols = Symbol::list_from_response(&data);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].symbol, "AAPL");
        assert_eq!(symbols[0].instrument_type, "Common Stock");
    }

    #[test]
    fn maps_exchange_schedule_sessions() {
        let data = json!({
            "code": "NASDAQ",
            "name": "NASDAQ Stock Market",
            "country": "United States",
            "timezone": "America/New_York",
            "date": "2025-04-11",
            "is_open": true,
            "hours": [
                {"type": "pre-market", "open": "04:00", "close": "09:30"},
                {"type": "regular", "open": "09:30", "close": "16:00"},
                {"type": "after-hours", "open": "16:00", "close": "20:00"}
            ],
            "holidays": ["2025-12-25"]
        });
        let schedule = ExchangeSchedule::from_response(&data).unwrap();
        assert_eq!(schedule.sessions.len(), 3);
        assert_eq!(schedule.sessions[1].session, "regular");
        assert_eq!(schedule.is_open, Some(true));
        assert_eq!(schedule.holidays, vec!["2025-12-25".to_string()]);
    }

    #[test]
    fn instrument_types_accept_strings_or_objects() {
        let types = InstrumentType::list_from_response(&json!(["ETF", {"id": "cs", "name": "Common Stock"}]));
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].id, "ETF");
        assert_eq!(types[1].name, "Common Stock");
    }
}
