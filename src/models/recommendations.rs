use chrono::{Duration, Local, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::ParseError;

/// One analyst firm's recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystRecommendation {
    pub firm: String,
    pub rating: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl AnalystRecommendation {
    fn from_response(data: &Value) -> Self {
        AnalystRecommendation {
            firm: field::str_field(data, "firm").unwrap_or_default(),
            rating: field::str_field(data, "rating").unwrap_or_default(),
            action: field::str_field(data, "action").unwrap_or_default(),
            target_price: field::f64_field(data, "target_price"),
            date: field::str_field(data, "date"),
        }
    }
}

/// Aggregated analyst consensus on the 1 (Strong Buy) to 5 (Strong Sell)
/// scale.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystConsensus {
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
    pub total_analysts: u32,
    pub average_score: f64,
    pub classification: String,
}

impl AnalystConsensus {
    /// Map vendor consensus counts; note the camelCase count keys.
    pub fn from_response(data: &Value) -> Self {
        let strong_buy = field::u64_field(data, "strongBuy").unwrap_or(0) as u32;
        let buy = field::u64_field(data, "buy").unwrap_or(0) as u32;
        let hold = field::u64_field(data, "hold").unwrap_or(0) as u32;
        let sell = field::u64_field(data, "sell").unwrap_or(0) as u32;
        let strong_sell = field::u64_field(data, "strongSell").unwrap_or(0) as u32;

        let total_analysts = field::u64_field(data, "total")
            .map(|t| t as u32)
            .filter(|t| *t > 0)
            .unwrap_or(strong_buy + buy + hold + sell + strong_sell);

        let average_score = field::f64_field(data, "average").unwrap_or_else(|| {
            if total_analysts == 0 {
                return 0.0;
            }
            let weighted = strong_buy + 2 * buy + 3 * hold + 4 * sell + 5 * strong_sell;
            f64::from(weighted) / f64::from(total_analysts)
        });

        AnalystConsensus {
            strong_buy,
            buy,
            hold,
            sell,
            strong_sell,
            total_analysts,
            average_score,
            classification: classify(average_score, total_analysts).to_string(),
        }
    }

    /// Percentage of analysts in each bucket: strong buy, buy, hold, sell,
    /// strong sell.
    pub fn distribution_percentages(&self) -> [f64; 5] {
        if self.total_analysts == 0 {
            return [0.0; 5];
        }
        let total = f64::from(self.total_analysts);
        [
            f64::from(self.strong_buy) / total * 100.0,
            f64::from(self.buy) / total * 100.0,
            f64::from(self.hold) / total * 100.0,
            f64::from(self.sell) / total * 100.0,
            f64::from(self.strong_sell) / total * 100.0,
        ]
    }

    /// (buy, hold, sell) percentages with the strong buckets folded in.
    pub fn buy_hold_sell_ratio(&self) -> (f64, f64, f64) {
        if self.total_analysts == 0 {
            return (0.0, 0.0, 0.0);
        }
        let total = f64::from(self.total_analysts);
        (
            f64::from(self.strong_buy + self.buy) / total * 100.0,
            f64::from(self.hold) / total * 100.0,
            f64::from(self.sell + self.strong_sell) / total * 100.0,
        )
    }
}

fn classify(score: f64, total: u32) -> &'static str {
    if score == 0.0 || total == 0 {
        "No Consensus"
    } else if (1.0..1.5).contains(&score) {
        "Strong Buy"
    } else if (1.5..2.5).contains(&score) {
        "Buy"
    } else if (2.5..3.5).contains(&score) {
        "Hold"
    } else if (3.5..4.5).contains(&score) {
        "Sell"
    } else if (4.5..=5.0).contains(&score) {
        "Strong Sell"
    } else {
        "Unknown"
    }
}

/// Full recommendations payload for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystRecommendations {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub consensus: AnalystConsensus,
    pub recommendations: Vec<AnalystRecommendation>,
}

impl AnalystRecommendations {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;
        let consensus =
            AnalystConsensus::from_response(data.get("consensus").unwrap_or(&Value::Null));
        let recommendations = data
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|i| i.is_object())
                    .map(AnalystRecommendation::from_response)
                    .collect()
            })
            .unwrap_or_default();
        Ok(AnalystRecommendations {
            symbol,
            name: field::str_field(data, "name"),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            last_updated: field::str_field(data, "last_updated"),
            consensus,
            recommendations,
        })
    }

    /// Recommendations dated within the last `days` days; undated or
    /// unparseable entries are skipped.
    pub fn recent_recommendations(&self, days: i64) -> Vec<&AnalystRecommendation> {
        let cutoff = Local::now().naive_local() - Duration::days(days);
        self.recommendations
            .iter()
            .filter(|rec| {
                rec.date
                    .as_deref()
                    .and_then(field::parse_datetime)
                    .map(|date: NaiveDateTime| date >= cutoff)
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weighted_average_and_classification() {
        let consensus = AnalystConsensus::from_response(&json!({
            "strongBuy": 10, "buy": 20, "hold": 5, "sell": 1, "strongSell": 0
        }));
        assert_eq!(consensus.total_analysts, 36);
        // (10 + 40 + 15 + 4) / 36
        assert!((consensus.average_score - 1.9166).abs() < 0.001);
        assert_eq!(consensus.classification, "Buy");
    }

    #[test]
    fn empty_counts_mean_no_consensus() {
        let consensus = AnalystConsensus::from_response(&json!({}));
        assert_eq!(consensus.total_analysts, 0);
        assert_eq!(consensus.classification, "No Consensus");
        assert_eq!(consensus.distribution_percentages(), [0.0; 5]);
    }

    #[test]
    fn boundary_scores_classify_correctly() {
        assert_eq!(classify(1.0, 1), "Strong Buy");
        assert_eq!(classify(1.5, 1), "Buy");
        assert_eq!(classify(2.5, 1), "Hold");
        assert_eq!(classify(3.5, 1), "Sell");
        assert_eq!(classify(4.5, 1), "Strong Sell");
        assert_eq!(classify(5.0, 1), "Strong Sell");
    }

    #[test]
    fn buy_hold_sell_folds_strong_buckets() {
        let consensus = AnalystConsensus::from_response(&json!({
            "strongBuy": 5, "buy": 5, "hold": 5, "sell": 3, "strongSell": 2
        }));
        let (buy, hold, sell) = consensus.buy_hold_sell_ratio();
        assert_eq!(buy, 50.0);
        assert_eq!(hold, 25.0);
        assert_eq!(sell, 25.0);
    }

    #[test]
    fn recent_filter_skips_undated_entries() {
        let recs = AnalystRecommendations::from_response(&json!({
            "symbol": "AAPL",
            "consensus": {"strongBuy": 1},
            "recommendations": [
                {"firm": "Old House", "rating": "Buy", "action": "Maintains", "date": "2001-01-01"},
                {"firm": "No Date", "rating": "Hold", "action": "Initiates"}
            ]
        }))
        .unwrap();
        assert!(recs.recent_recommendations(30).is_empty());
        assert_eq!(recs.recommendations.len(), 2);
    }
}
