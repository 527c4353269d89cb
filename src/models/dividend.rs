use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::models::field;
use crate::models::ParseError;

/// One dividend payment.
#[derive(Debug, Clone, Serialize)]
pub struct Dividend {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex_dividend_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration_date: Option<NaiveDateTime>,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Dividend {
    /// Map one dividend entry. Dates that fail to parse degrade to `None`
    /// with a warning; a bad amount degrades to zero.
    pub fn from_response(data: &Value, symbol: &str) -> Self {
        Dividend {
            symbol: symbol.to_string(),
            payment_date: field::datetime_field(data, "payment_date"),
            ex_dividend_date: field::datetime_field(data, "ex_dividend_date"),
            record_date: field::datetime_field(data, "record_date"),
            declaration_date: field::datetime_field(data, "declaration_date"),
            amount: field::f64_field(data, "amount").unwrap_or_else(|| {
                warn!("Could not parse dividend amount for {}", symbol);
                0.0
            }),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            frequency: field::str_field(data, "frequency"),
            description: field::str_field(data, "description"),
        }
    }
}

/// Dividend history for one symbol, with per-year analytics.
#[derive(Debug, Clone, Serialize)]
pub struct DividendHistory {
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub exchange: String,
    pub mic_code: String,
    pub country: String,
    pub instrument_type: String,
    pub dividends: Vec<Dividend>,
}

impl DividendHistory {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let meta = data
            .get("meta")
            .ok_or(ParseError::UnexpectedShape("dividend history without meta"))?;
        let symbol = field::str_field(meta, "symbol").ok_or(ParseError::MissingField("symbol"))?;

        let dividends = data
            .get("dividends")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| Dividend::from_response(item, &symbol))
                    .collect()
            })
            .unwrap_or_default();

        Ok(DividendHistory {
            name: field::str_field(meta, "name").unwrap_or_default(),
            currency: field::str_field(meta, "currency").unwrap_or_else(|| "USD".to_string()),
            exchange: field::str_field(meta, "exchange").unwrap_or_default(),
            mic_code: field::str_field(meta, "mic_code").unwrap_or_default(),
            country: field::str_field(meta, "country").unwrap_or_default(),
            instrument_type: field::str_field(meta, "type").unwrap_or_default(),
            symbol,
            dividends,
        })
    }

    /// Total paid per payment year, ordered by year.
    pub fn annual_dividends(&self) -> BTreeMap<i32, f64> {
        let mut annual = BTreeMap::new();
        for dividend in &self.dividends {
            if let Some(paid) = dividend.payment_date {
                use chrono::Datelike;
                *annual.entry(paid.year()).or_insert(0.0) += dividend.amount;
            }
        }
        annual
    }

    pub fn total_dividends(&self) -> f64 {
        self.dividends.iter().map(|d| d.amount).sum()
    }

    pub fn average_annual_dividend(&self) -> f64 {
        let annual = self.annual_dividends();
        if annual.is_empty() {
            return 0.0;
        }
        annual.values().sum::<f64>() / annual.len() as f64
    }

    /// Year-over-year growth rate in percent, keyed by the later year.
    /// Years following a zero-total year are skipped.
    pub fn dividend_growth_rate(&self) -> BTreeMap<i32, f64> {
        let annual = self.annual_dividends();
        let mut growth = BTreeMap::new();
        let years: Vec<(&i32, &f64)> = annual.iter().collect();
        for window in years.windows(2) {
            let (_, prev_total) = window[0];
            let (year, total) = window[1];
            if *prev_total > 0.0 {
                growth.insert(*year, (total - prev_total) / prev_total * 100.0);
            }
        }
        growth
    }
}

/// One entry in the dividend calendar.
#[derive(Debug, Clone, Serialize)]
pub struct DividendCalendarEvent {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex_dividend_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration_date: Option<NaiveDateTime>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(rename = "yield", skip_serializing_if = "Option::is_none")]
    pub yield_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_type: Option<String>,
}

impl DividendCalendarEvent {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        Ok(DividendCalendarEvent {
            symbol,
            name: field::str_field(data, "name").unwrap_or_default(),
            exchange: field::str_field(data, "exchange").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            payment_date: field::datetime_field(data, "payment_date"),
            ex_dividend_date: field::datetime_field(data, "ex_dividend_date"),
            record_date: field::datetime_field(data, "record_date"),
            declaration_date: field::datetime_field(data, "declaration_date"),
            amount: field::f64_field(data, "amount").unwrap_or(0.0),
            frequency: field::str_field(data, "frequency"),
            yield_value: field::f64_field(data, "yield"),
            dividend_type: field::str_field(data, "dividend_type"),
        })
    }
}

/// Upcoming dividend events over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct DividendCalendar {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub events: Vec<DividendCalendarEvent>,
}

impl DividendCalendar {
    pub fn from_response(data: &Value, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let items = field::data_array(data)
            .cloned()
            .or_else(|| data.get("events").and_then(Value::as_array).cloned())
            .unwrap_or_default();

        let mut events = Vec::with_capacity(items.len());
        for item in &items {
            match DividendCalendarEvent::from_response(item) {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping dividend calendar entry: {}", e),
            }
        }
        DividendCalendar {
            start_date,
            end_date,
            events,
        }
    }

    /// Group events by ex-dividend date, events without one excluded.
    pub fn events_by_date(&self) -> BTreeMap<NaiveDate, Vec<&DividendCalendarEvent>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<&DividendCalendarEvent>> = BTreeMap::new();
        for event in &self.events {
            if let Some(ex_date) = event.ex_dividend_date {
                grouped.entry(ex_date.date()).or_default().push(event);
            }
        }
        grouped
    }

    /// Group events by symbol.
    pub fn events_by_symbol(&self) -> BTreeMap<&str, Vec<&DividendCalendarEvent>> {
        let mut grouped: BTreeMap<&str, Vec<&DividendCalendarEvent>> = BTreeMap::new();
        for event in &self.events {
            grouped.entry(event.symbol.as_str()).or_default().push(event);
        }
        grouped
    }

    /// Keep only events for the given symbol, case-insensitive.
    pub fn retain_symbol(&mut self, symbol: &str) {
        self.events
            .retain(|e| e.symbol.eq_ignore_ascii_case(symbol));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history_payload() -> Value {
        json!({
            "meta": {
                "symbol": "KO",
                "name": "Coca-Cola",
                "currency": "USD",
                "exchange": "NYSE"
            },
            "dividends": [
                {"payment_date": "2023-04-03", "amount": "0.44"},
                {"payment_date": "2023-07-03", "amount": "0.44"},
                {"payment_date": "2024-04-01", "amount": "0.485"},
                {"payment_date": "2024-07-01", "amount": "0.485"},
                {"payment_date": "not a date", "amount": "oops"}
            ]
        })
    }

    #[test]
    fn computes_annual_totals_and_growth() {
        let history = DividendHistory::from_response(&history_payload()).unwrap();
        let annual = history.annual_dividends();
        assert_eq!(annual[&2023], 0.88);
        assert_eq!(annual[&2024], 0.97);

        let growth = history.dividend_growth_rate();
        assert!((growth[&2024] - 10.227).abs() < 0.01);
        assert!((history.average_annual_dividend() - 0.925).abs() < 1e-9);
    }

    #[test]
    fn bad_entries_degrade_instead_of_failing() {
        let history = DividendHistory::from_response(&history_payload()).unwrap();
        // The malformed entry still exists, with defaults.
        assert_eq!(history.dividends.len(), 5);
        let last = &history.dividends[4];
        assert!(last.payment_date.is_none());
        assert_eq!(last.amount, 0.0);
    }

    #[test]
    fn calendar_groups_by_ex_date() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        let calendar = DividendCalendar::from_response(
            &json!([
                {"symbol": "KO", "ex_dividend_date": "2025-04-10", "amount": "0.485", "yield": "3.1"},
                {"symbol": "PEP", "ex_dividend_date": "2025-04-10", "amount": "1.355"},
                {"symbol": "MSFT", "ex_dividend_date": "2025-04-16", "amount": "0.75"}
            ]),
            start,
            end,
        );
        let grouped = calendar.events_by_date();
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped[&NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()].len(),
            2
        );
    }

    #[test]
    fn calendar_groups_and_filters_by_symbol() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        let mut calendar = DividendCalendar::from_response(
            &json!([
                {"symbol": "KO", "ex_dividend_date": "2025-04-10", "amount": "0.485"},
                {"symbol": "KO", "ex_dividend_date": "2025-04-24", "amount": "0.485"},
                {"symbol": "PEP", "ex_dividend_date": "2025-04-10", "amount": "1.355"}
            ]),
            start,
            end,
        );
        let grouped = calendar.events_by_symbol();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["KO"].len(), 2);

        calendar.retain_symbol("pep");
        assert_eq!(calendar.events.len(), 1);
        assert_eq!(calendar.events[0].symbol, "PEP");
    }
}
