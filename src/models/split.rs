use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::models::field;
use crate::models::ParseError;

/// Factors parsed from a vendor split description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitFactors {
    pub from_factor: u32,
    pub to_factor: u32,
    pub ratio: f64,
}

impl Default for SplitFactors {
    fn default() -> Self {
        SplitFactors {
            from_factor: 1,
            to_factor: 1,
            ratio: 1.0,
        }
    }
}

/// Parse split text in any of the vendor's shapes: `"2:1"`, `"2-for-1"`,
/// `"2 for 1"`, or a bare decimal ratio like `"0.5"`. A numeric `ratio`
/// field on the entry overrides the parsed ratio.
pub fn parse_split_factors(data: &Value) -> SplitFactors {
    let mut factors = SplitFactors::default();

    if let Some(text) = field::str_field(data, "split") {
        if let Some((from_str, to_str)) = text.split_once(':') {
            apply_pair(&mut factors, from_str, to_str, &text);
        } else {
            let lowered = text.to_lowercase().replace("-for-", " for ");
            if let Some((from_str, to_str)) = lowered.split_once(" for ") {
                apply_pair(&mut factors, from_str, to_str, &text);
            } else if let Ok(ratio) = text.trim().parse::<f64>() {
                factors.ratio = ratio;
                if ratio > 1.0 {
                    factors.from_factor = ratio as u32;
                    factors.to_factor = 1;
                } else if ratio > 0.0 && ratio < 1.0 {
                    factors.from_factor = 1;
                    factors.to_factor = (1.0 / ratio) as u32;
                }
            } else {
                warn!("Could not parse split text {:?}", text);
            }
        }
    }

    if let Some(ratio) = field::f64_field(data, "ratio") {
        factors.ratio = ratio;
    }
    factors
}

fn apply_pair(factors: &mut SplitFactors, from_str: &str, to_str: &str, raw: &str) {
    match (
        from_str.trim().parse::<u32>(),
        to_str.trim().parse::<u32>(),
    ) {
        (Ok(from), Ok(to)) if to != 0 => {
            factors.from_factor = from;
            factors.to_factor = to;
            factors.ratio = f64::from(from) / f64::from(to);
        }
        _ => warn!("Could not parse split text {:?}", raw),
    }
}

/// A historical stock split event.
#[derive(Debug, Clone, Serialize)]
pub struct StockSplit {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    pub from_factor: u32,
    pub to_factor: u32,
    pub ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

impl StockSplit {
    pub fn from_response(data: &Value, symbol: &str, name: Option<&str>) -> Self {
        let factors = parse_split_factors(data);
        StockSplit {
            symbol: symbol.to_string(),
            date: field::datetime_field(data, "date"),
            from_factor: factors.from_factor,
            to_factor: factors.to_factor,
            ratio: factors.ratio,
            name: name
                .map(String::from)
                .or_else(|| field::str_field(data, "name")),
            exchange: field::str_field(data, "exchange"),
        }
    }

    pub fn split_text(&self) -> String {
        format!("{}:{}", self.from_factor, self.to_factor)
    }

    pub fn is_forward(&self) -> bool {
        self.ratio > 1.0
    }

    pub fn is_reverse(&self) -> bool {
        self.ratio < 1.0
    }

    /// Three-way direction label, `"None"` for a 1:1 ratio.
    pub fn direction_label(&self) -> &'static str {
        if self.is_forward() {
            "Forward"
        } else if self.is_reverse() {
            "Reverse"
        } else {
            "None"
        }
    }

    pub fn effect_description(&self) -> String {
        if self.is_forward() {
            format!(
                "Shareholders received {} shares for every {} share owned",
                self.from_factor, self.to_factor
            )
        } else if self.is_reverse() {
            format!(
                "Shareholders received {} share for every {} shares owned",
                self.to_factor, self.from_factor
            )
        } else {
            "No change in number of shares".to_string()
        }
    }
}

/// Split history for one symbol, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct SplitHistory {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub splits: Vec<StockSplit>,
}

impl SplitHistory {
    pub fn from_response(data: &Value, symbol: &str) -> Self {
        let name = data
            .get("meta")
            .and_then(|m| field::str_field(m, "name"));
        let mut splits: Vec<StockSplit> = data
            .get("splits")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| StockSplit::from_response(item, symbol, name.as_deref()))
                    .collect()
            })
            .unwrap_or_default();
        splits.sort_by(|a, b| b.date.cmp(&a.date));
        SplitHistory {
            symbol: symbol.to_string(),
            name,
            splits,
        }
    }

    pub fn splits_by_year(&self) -> BTreeMap<i32, Vec<&StockSplit>> {
        use chrono::Datelike;
        let mut grouped: BTreeMap<i32, Vec<&StockSplit>> = BTreeMap::new();
        for split in &self.splits {
            if let Some(date) = split.date {
                grouped.entry(date.year()).or_default().push(split);
            }
        }
        grouped
    }

    /// Multiply original shares by this to get post-split shares over the
    /// given range. Undated splits are excluded.
    pub fn cumulative_split_factor(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> f64 {
        self.splits
            .iter()
            .filter(|s| {
                let Some(date) = s.date else { return false };
                start.map_or(true, |from| date >= from) && end.map_or(true, |to| date <= to)
            })
            .map(|s| s.ratio)
            .product()
    }
}

/// One announced or completed split in the calendar.
#[derive(Debug, Clone, Serialize)]
pub struct SplitCalendarEvent {
    #[serde(flatten)]
    pub split: StockSplit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SplitCalendarEvent {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        Ok(SplitCalendarEvent {
            split: StockSplit::from_response(data, &symbol, None),
            status: field::str_field(data, "status"),
        })
    }
}

/// Upcoming split events over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct SplitsCalendar {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub events: Vec<SplitCalendarEvent>,
}

impl SplitsCalendar {
    pub fn from_response(data: &Value, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let items = field::data_array(data)
            .cloned()
            .or_else(|| data.get("events").and_then(Value::as_array).cloned())
            .unwrap_or_default();
        let mut events = Vec::with_capacity(items.len());
        for item in &items {
            match SplitCalendarEvent::from_response(item) {
                Ok(event) => events.push(event),
                Err(e) => warn!("Skipping split calendar entry: {}", e),
            }
        }
        SplitsCalendar {
            start_date,
            end_date,
            events,
        }
    }

    pub fn events_by_date(&self) -> BTreeMap<NaiveDate, Vec<&SplitCalendarEvent>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<&SplitCalendarEvent>> = BTreeMap::new();
        for event in &self.events {
            if let Some(date) = event.split.date {
                grouped.entry(date.date()).or_default().push(event);
            }
        }
        grouped
    }

    pub fn events_by_symbol(&self) -> BTreeMap<&str, Vec<&SplitCalendarEvent>> {
        let mut grouped: BTreeMap<&str, Vec<&SplitCalendarEvent>> = BTreeMap::new();
        for event in &self.events {
            grouped
                .entry(event.split.symbol.as_str())
                .or_default()
                .push(event);
        }
        grouped
    }

    /// Keep only events for the given symbol, case-insensitive.
    pub fn retain_symbol(&mut self, symbol: &str) {
        self.events
            .retain(|e| e.split.symbol.eq_ignore_ascii_case(symbol));
    }

    /// Keep only forward or only reverse splits.
    pub fn filter_forward(&self, forward: bool) -> Vec<&SplitCalendarEvent> {
        self.events
            .iter()
            .filter(|e| {
                if forward {
                    e.split.is_forward()
                } else {
                    e.split.is_reverse()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_colon_format() {
        let f = parse_split_factors(&json!({"split": "2:1"}));
        assert_eq!((f.from_factor, f.to_factor), (2, 1));
        assert_eq!(f.ratio, 2.0);
    }

    #[test]
    fn parses_for_formats() {
        let f = parse_split_factors(&json!({"split": "3-for-1"}));
        assert_eq!((f.from_factor, f.to_factor), (3, 1));
        let f = parse_split_factors(&json!({"split": "4 FOR 1"}));
        assert_eq!((f.from_factor, f.to_factor), (4, 1));
    }

    #[test]
    fn parses_decimal_ratios() {
        let forward = parse_split_factors(&json!({"split": "2.0"}));
        assert_eq!((forward.from_factor, forward.to_factor), (2, 1));

        let reverse = parse_split_factors(&json!({"split": "0.5"}));
        assert_eq!((reverse.from_factor, reverse.to_factor), (1, 2));
        assert_eq!(reverse.ratio, 0.5);
    }

    #[test]
    fn explicit_ratio_field_overrides_text() {
        let f = parse_split_factors(&json!({"split": "2:1", "ratio": "3.0"}));
        assert_eq!(f.ratio, 3.0);
        assert_eq!((f.from_factor, f.to_factor), (2, 1));
    }

    #[test]
    fn unparseable_text_keeps_defaults() {
        let f = parse_split_factors(&json!({"split": "two to one"}));
        assert_eq!(f, SplitFactors::default());
    }

    #[test]
    fn history_sorts_newest_first_and_compounds() {
        let history = SplitHistory::from_response(
            &json!({
                "meta": {"name": "Apple Inc"},
                "splits": [
                    {"date": "2014-06-09", "split": "7:1"},
                    {"date": "2020-08-31", "split": "4:1"}
                ]
            }),
            "AAPL",
        );
        assert_eq!(history.splits[0].split_text(), "4:1");
        assert_eq!(history.cumulative_split_factor(None, None), 28.0);
        assert!(history.splits[0].is_forward());
    }

    #[test]
    fn direction_label_is_three_way() {
        let forward = StockSplit::from_response(&json!({"split": "10:1"}), "NVDA", None);
        assert_eq!(forward.direction_label(), "Forward");

        let reverse = StockSplit::from_response(&json!({"split": "1:5"}), "XYZ", None);
        assert_eq!(reverse.direction_label(), "Reverse");

        let unchanged = StockSplit::from_response(&json!({"split": "1:1"}), "FLAT", None);
        assert_eq!(unchanged.direction_label(), "None");
    }

    #[test]
    fn groups_splits_by_year() {
        let history = SplitHistory::from_response(
            &json!({
                "splits": [
                    {"date": "2020-08-31", "split": "4:1"},
                    {"date": "2020-02-03", "split": "2:1"},
                    {"date": "2014-06-09", "split": "7:1"},
                    {"split": "3:1"}
                ]
            }),
            "AAPL",
        );
        let grouped = history.splits_by_year();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&2020].len(), 2);
        assert_eq!(grouped[&2014].len(), 1);
    }

    #[test]
    fn calendar_groups_by_symbol() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let calendar = SplitsCalendar::from_response(
            &json!([
                {"symbol": "AAA", "date": "2025-06-01", "split": "2:1"},
                {"symbol": "AAA", "date": "2025-09-01", "split": "3:1"},
                {"symbol": "BBB", "date": "2025-06-01", "split": "1:10"}
            ]),
            start,
            end,
        );
        let grouped = calendar.events_by_symbol();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["AAA"].len(), 2);
        assert_eq!(calendar.events_by_date().len(), 2);
    }

    #[test]
    fn calendar_filters_reverse_splits() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let calendar = SplitsCalendar::from_response(
            &json!([
                {"symbol": "AAA", "date": "2025-06-01", "split": "2:1", "status": "announced"},
                {"symbol": "BBB", "date": "2025-06-02", "split": "1:10", "status": "announced"}
            ]),
            start,
            end,
        );
        let reverse = calendar.filter_forward(false);
        assert_eq!(reverse.len(), 1);
        assert_eq!(reverse[0].split.symbol, "BBB");
        assert_eq!(reverse[0].split.effect_description().contains("received"), true);
    }
}
