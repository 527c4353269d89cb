use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::ParseError;

/// Upgrade/downgrade counts for one revision bucket.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RevisionCounts {
    pub upgrades: u32,
    pub downgrades: u32,
    pub maintained: u32,
    pub total: u32,
}

impl RevisionCounts {
    fn from_response(data: &Value) -> Self {
        RevisionCounts {
            upgrades: field::u64_field(data, "upgrades").unwrap_or(0) as u32,
            downgrades: field::u64_field(data, "downgrades").unwrap_or(0) as u32,
            maintained: field::u64_field(data, "maintained").unwrap_or(0) as u32,
            total: field::u64_field(data, "total").unwrap_or(0) as u32,
        }
    }

    /// Upgrades minus downgrades.
    pub fn net(&self) -> i64 {
        i64::from(self.upgrades) - i64::from(self.downgrades)
    }
}

/// Revisions over one window (a week or a month), with any nested
/// per-period breakdown the vendor includes alongside the top-level counts.
#[derive(Debug, Clone, Serialize)]
pub struct EpsRevisionPeriod {
    pub period_type: String,
    pub counts: RevisionCounts,
    pub by_period: BTreeMap<String, RevisionCounts>,
}

impl EpsRevisionPeriod {
    pub fn from_response(period_type: &str, data: &Value) -> Self {
        let counts = RevisionCounts::from_response(data);
        let by_period = data
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(_, v)| v.is_object())
                    .map(|(k, v)| (k.clone(), RevisionCounts::from_response(v)))
                    .collect()
            })
            .unwrap_or_default();
        EpsRevisionPeriod {
            period_type: period_type.to_string(),
            counts,
            by_period,
        }
    }

    pub fn sentiment_label(&self) -> &'static str {
        match self.counts.net() {
            n if n > 0 => "Positive",
            n if n < 0 => "Negative",
            _ => "Neutral",
        }
    }
}

/// EPS estimate revisions for one symbol, split into weekly and monthly
/// windows.
#[derive(Debug, Clone, Serialize)]
pub struct EpsRevisions {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub currency: String,
    pub weekly: EpsRevisionPeriod,
    pub monthly: EpsRevisionPeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl EpsRevisions {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        Ok(EpsRevisions {
            symbol,
            name: field::str_field(data, "name"),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            weekly: EpsRevisionPeriod::from_response(
                "week",
                data.get("week").unwrap_or(&Value::Null),
            ),
            monthly: EpsRevisionPeriod::from_response(
                "month",
                data.get("month").unwrap_or(&Value::Null),
            ),
            last_updated: field::str_field(data, "last_updated"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_weekly_and_monthly_counts() {
        let revisions = EpsRevisions::from_response(&json!({
            "symbol": "AAPL",
            "week": {"upgrades": 3, "downgrades": 1, "maintained": 10, "total": 14},
            "month": {"upgrades": 5, "downgrades": 8, "maintained": 20, "total": 33}
        }))
        .unwrap();
        assert_eq!(revisions.weekly.counts.upgrades, 3);
        assert_eq!(revisions.weekly.counts.net(), 2);
        assert_eq!(revisions.weekly.sentiment_label(), "Positive");
        assert_eq!(revisions.monthly.counts.net(), -3);
        assert_eq!(revisions.monthly.sentiment_label(), "Negative");
    }

    #[test]
    fn collects_nested_period_breakdown() {
        let period = EpsRevisionPeriod::from_response(
            "week",
            &json!({
                "upgrades": 2,
                "current_quarter": {"upgrades": 1, "downgrades": 0, "total": 1},
                "next_quarter": {"upgrades": 1, "downgrades": 2, "total": 3}
            }),
        );
        assert_eq!(period.by_period.len(), 2);
        assert_eq!(period.by_period["next_quarter"].downgrades, 2);
    }

    #[test]
    fn missing_windows_default_to_zero() {
        let revisions = EpsRevisions::from_response(&json!({"symbol": "AAPL"})).unwrap();
        assert_eq!(revisions.weekly.counts.total, 0);
        assert_eq!(revisions.weekly.sentiment_label(), "Neutral");
    }

    #[test]
    fn requires_symbol() {
        assert!(EpsRevisions::from_response(&json!({"week": {}})).is_err());
    }
}
