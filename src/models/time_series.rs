use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::models::field;
use crate::models::ParseError;

/// One OHLCV bar.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesBar {
    pub datetime: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl TimeSeriesBar {
    fn from_response(data: &Value) -> Option<Self> {
        let datetime = field::datetime_field(data, "datetime")?;
        Some(TimeSeriesBar {
            datetime,
            open: field::f64_field(data, "open")?,
            high: field::f64_field(data, "high")?,
            low: field::f64_field(data, "low")?,
            close: field::f64_field(data, "close")?,
            volume: field::u64_field(data, "volume"),
        })
    }
}

/// Price history for one symbol at one interval.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    pub symbol: String,
    pub interval: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument_type: Option<String>,
    pub bars: Vec<TimeSeriesBar>,
}

impl TimeSeries {
    /// Map a `meta` + `values` payload. Bars that cannot be parsed are
    /// skipped with a warning.
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let meta = data
            .get("meta")
            .ok_or(ParseError::UnexpectedShape("time series without meta"))?;
        let symbol = field::str_field(meta, "symbol").ok_or(ParseError::MissingField("symbol"))?;

        let mut bars = Vec::new();
        if let Some(values) = data.get("values").and_then(Value::as_array) {
            for item in values {
                match TimeSeriesBar::from_response(item) {
                    Some(bar) => bars.push(bar),
                    None => warn!("Skipping unparseable bar for {}", symbol),
                }
            }
        }

        Ok(TimeSeries {
            symbol,
            interval: field::str_field(meta, "interval").unwrap_or_else(|| "1day".to_string()),
            currency: field::str_field(meta, "currency").unwrap_or_else(|| "USD".to_string()),
            exchange: field::str_field(meta, "exchange"),
            instrument_type: field::str_field(meta, "type"),
            bars,
        })
    }

    /// Order bars by timestamp; vendor order is not trusted.
    pub fn sort(&mut self, ascending: bool) {
        self.bars.sort_by(|a, b| {
            if ascending {
                a.datetime.cmp(&b.datetime)
            } else {
                b.datetime.cmp(&a.datetime)
            }
        });
    }

    /// Keep the first `limit` bars after sorting; 0 keeps everything.
    pub fn truncate(&mut self, limit: usize) {
        if limit > 0 && self.bars.len() > limit {
            self.bars.truncate(limit);
        }
    }
}

/// First available bar for a symbol/interval pair.
#[derive(Debug, Clone, Serialize)]
pub struct EarliestTimestamp {
    pub datetime: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unix_time: Option<i64>,
}

impl EarliestTimestamp {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let datetime =
            field::datetime_field(data, "datetime").ok_or(ParseError::MissingField("datetime"))?;
        Ok(EarliestTimestamp {
            datetime,
            unix_time: field::i64_field(data, "unix_time"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_series() -> Value {
        json!({
            "meta": {
                "symbol": "AAPL",
                "interval": "1day",
                "currency": "USD",
                "exchange": "NASDAQ",
                "type": "Common Stock"
            },
            "values": [
                {"datetime": "2025-04-10", "open": "195.0", "high": "199.0",
                 "low": "194.5", "close": "198.5", "volume": "50000000"},
                {"datetime": "2025-04-11", "open": "198.6", "high": "200.2",
                 "low": "197.9", "close": "199.9", "volume": "43000000"},
                {"datetime": "bogus", "open": "1", "high": "1", "low": "1", "close": "1"}
            ]
        })
    }

    #[test]
    fn maps_meta_and_skips_bad_bars() {
        let series = TimeSeries::from_response(&sample_series()).unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.interval, "1day");
        assert_eq!(series.bars.len(), 2);
    }

    #[test]
    fn sorts_and_truncates() {
        let mut series = TimeSeries::from_response(&sample_series()).unwrap();
        series.sort(false);
        assert!(series.bars[0].datetime > series.bars[1].datetime);
        series.truncate(1);
        assert_eq!(series.bars.len(), 1);
        series.truncate(0);
        assert_eq!(series.bars.len(), 1);
    }

    #[test]
    fn missing_meta_is_an_error() {
        assert!(TimeSeries::from_response(&json!({"values": []})).is_err());
    }
}
