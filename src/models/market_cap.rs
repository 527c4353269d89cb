use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::ParseError;

/// Market capitalization at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MarketCapPoint {
    pub datetime: String,
    pub market_cap: f64,
    pub shares_outstanding: f64,
}

impl MarketCapPoint {
    fn from_response(data: &Value) -> Self {
        MarketCapPoint {
            datetime: field::str_field(data, "datetime").unwrap_or_default(),
            market_cap: field::f64_field(data, "market_cap").unwrap_or(0.0),
            shares_outstanding: field::f64_field(data, "shares_outstanding").unwrap_or(0.0),
        }
    }

    pub fn formatted(&self) -> String {
        format_market_cap(self.market_cap)
    }
}

/// Summary statistics over a market cap series.
#[derive(Debug, Clone, Serialize)]
pub struct MarketCapSummary {
    pub min_cap: f64,
    pub max_cap: f64,
    pub avg_cap: f64,
    pub start_cap: f64,
    pub end_cap: f64,
    pub change_value: f64,
    pub change_percent: f64,
}

/// Market capitalization history for one symbol, oldest point first.
#[derive(Debug, Clone, Serialize)]
pub struct MarketCapHistory {
    pub symbol: String,
    pub interval: String,
    pub currency: String,
    pub points: Vec<MarketCapPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MarketCapSummary>,
}

impl MarketCapHistory {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let meta = data
            .get("meta")
            .filter(|m| m.is_object())
            .ok_or(ParseError::UnexpectedShape("market cap payload has no meta"))?;
        let symbol = field::str_field(meta, "symbol").ok_or(ParseError::MissingField("symbol"))?;

        let mut points: Vec<MarketCapPoint> = data
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(MarketCapPoint::from_response).collect())
            .unwrap_or_default();
        points.sort_by(|a, b| a.datetime.cmp(&b.datetime));

        let summary = summarize(&points);
        Ok(MarketCapHistory {
            symbol,
            interval: field::str_field(meta, "interval").unwrap_or_default(),
            currency: field::str_field(meta, "currency").unwrap_or_else(|| "USD".to_string()),
            points,
            summary,
        })
    }
}

fn summarize(points: &[MarketCapPoint]) -> Option<MarketCapSummary> {
    let first = points.first()?;
    let last = points.last()?;

    let mut min_cap = f64::MAX;
    let mut max_cap = f64::MIN;
    let mut sum = 0.0;
    for point in points {
        min_cap = min_cap.min(point.market_cap);
        max_cap = max_cap.max(point.market_cap);
        sum += point.market_cap;
    }

    let start_cap = first.market_cap;
    let end_cap = last.market_cap;
    let change_value = end_cap - start_cap;
    let change_percent = if start_cap > 0.0 {
        change_value / start_cap * 100.0
    } else {
        0.0
    };

    Some(MarketCapSummary {
        min_cap,
        max_cap,
        avg_cap: sum / points.len() as f64,
        start_cap,
        end_cap,
        change_value,
        change_percent,
    })
}

/// `"$3.45T"`, `"$125.32B"`, down to a plain dollar figure under a thousand.
pub fn format_market_cap(value: f64) -> String {
    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if magnitude >= 1e12 {
        format!("{sign}${:.2}T", magnitude / 1e12)
    } else if magnitude >= 1e9 {
        format!("{sign}${:.2}B", magnitude / 1e9)
    } else if magnitude >= 1e6 {
        format!("{sign}${:.2}M", magnitude / 1e6)
    } else if magnitude >= 1e3 {
        format!("{sign}${:.2}K", magnitude / 1e3)
    } else {
        format!("{sign}${magnitude:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_history() -> Value {
        json!({
            "meta": {"symbol": "AAPL", "interval": "1day", "currency": "USD"},
            "values": [
                {"datetime": "2025-01-03 00:00:00", "market_cap": "3700000000000",
                 "shares_outstanding": "15100000000"},
                {"datetime": "2025-01-02 00:00:00", "market_cap": "3650000000000",
                 "shares_outstanding": "15100000000"}
            ]
        })
    }

    #[test]
    fn sorts_points_ascending_and_summarizes() {
        let history = MarketCapHistory::from_response(&sample_history()).unwrap();
        assert_eq!(history.points[0].datetime, "2025-01-02 00:00:00");
        let summary = history.summary.unwrap();
        assert_eq!(summary.start_cap, 3.65e12);
        assert_eq!(summary.end_cap, 3.7e12);
        assert_eq!(summary.change_value, 5e10);
        assert!((summary.change_percent - 1.3698).abs() < 0.001);
    }

    #[test]
    fn empty_series_has_no_summary() {
        let history = MarketCapHistory::from_response(&json!({
            "meta": {"symbol": "AAPL"},
            "values": []
        }))
        .unwrap();
        assert!(history.summary.is_none());
        assert!(history.points.is_empty());
    }

    #[test]
    fn missing_meta_is_an_error() {
        assert!(MarketCapHistory::from_response(&json!({"values": []})).is_err());
    }

    #[test]
    fn formats_by_magnitude() {
        assert_eq!(format_market_cap(3.45e12), "$3.45T");
        assert_eq!(format_market_cap(125.32e9), "$125.32B");
        assert_eq!(format_market_cap(48.5e6), "$48.50M");
        assert_eq!(format_market_cap(7200.0), "$7.20K");
        assert_eq!(format_market_cap(950.0), "$950.00");
        assert_eq!(format_market_cap(-2.5e9), "-$2.50B");
    }
}
