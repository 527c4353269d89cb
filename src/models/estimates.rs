use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::ParseError;

/// One EPS or revenue estimate row.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub period: String,
    pub period_end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_value: Option<f64>,
    pub estimate_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surprise_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surprise_percent: Option<f64>,
}

impl Estimate {
    fn from_response(data: &Value) -> Self {
        Estimate {
            period: field::str_field(data, "period").unwrap_or_default(),
            period_end_date: field::str_field(data, "end_date").unwrap_or_default(),
            estimate_value: field::f64_field(data, "estimate_value"),
            estimate_count: field::u64_field(data, "number_analyst_estimates").unwrap_or(0) as u32,
            actual_value: field::f64_field(data, "actual_value"),
            surprise_value: field::f64_field(data, "surprise_value"),
            surprise_percent: field::f64_field(data, "surprise_percent"),
        }
    }

    /// `"Q1 2025 (ending Mar 31, 2025)"` when the end date parses, the bare
    /// period otherwise.
    pub fn period_label(&self) -> String {
        match field::parse_datetime(&self.period_end_date) {
            Some(date) => format!("{} (ending {})", self.period, date.format("%b %d, %Y")),
            None => self.period.clone(),
        }
    }
}

/// Analyst price target summary.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_target: Option<f64>,
    pub analyst_count: u32,
    pub currency: String,
}

impl AnalystTarget {
    pub fn from_response(data: &Value) -> Self {
        AnalystTarget {
            mean_target: field::f64_field(data, "mean_target"),
            median_target: field::f64_field(data, "median_target"),
            high_target: field::f64_field(data, "high_target"),
            low_target: field::f64_field(data, "low_target"),
            analyst_count: field::u64_field(data, "number_of_analysts").unwrap_or(0) as u32,
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
        }
    }
}

/// Recommendation counts for one trend period.
///
/// Unlike the consensus feed, this one scores on an inverted scale:
/// 5 is Strong Buy, 1 is Strong Sell.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationTrend {
    pub period: String,
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
    pub total_analysts: u32,
    pub score: f64,
}

impl RecommendationTrend {
    pub fn from_response(data: &Value) -> Self {
        let strong_buy = field::u64_field(data, "strong_buy").unwrap_or(0) as u32;
        let buy = field::u64_field(data, "buy").unwrap_or(0) as u32;
        let hold = field::u64_field(data, "hold").unwrap_or(0) as u32;
        let sell = field::u64_field(data, "sell").unwrap_or(0) as u32;
        let strong_sell = field::u64_field(data, "strong_sell").unwrap_or(0) as u32;
        let total_analysts = strong_buy + buy + hold + sell + strong_sell;
        let score = if total_analysts > 0 {
            f64::from(5 * strong_buy + 4 * buy + 3 * hold + 2 * sell + strong_sell)
                / f64::from(total_analysts)
        } else {
            0.0
        };
        RecommendationTrend {
            period: field::str_field(data, "period").unwrap_or_else(|| "Unknown".to_string()),
            strong_buy,
            buy,
            hold,
            sell,
            strong_sell,
            total_analysts,
            score,
        }
    }

    pub fn recommendation_label(&self) -> &'static str {
        if self.total_analysts == 0 {
            "N/A"
        } else if self.score >= 4.5 {
            "Strong Buy"
        } else if self.score >= 3.5 {
            "Buy"
        } else if self.score >= 2.5 {
            "Hold"
        } else if self.score >= 1.5 {
            "Sell"
        } else {
            "Strong Sell"
        }
    }
}

/// Combined analyst estimates payload for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystEstimates {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub currency: String,
    pub quarterly_eps_estimates: Vec<Estimate>,
    pub annual_eps_estimates: Vec<Estimate>,
    pub quarterly_revenue_estimates: Vec<Estimate>,
    pub annual_revenue_estimates: Vec<Estimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_target: Option<AnalystTarget>,
    pub recommendation_trends: Vec<RecommendationTrend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl AnalystEstimates {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        let symbol = field::str_field(data, "symbol").ok_or(ParseError::MissingField("symbol"))?;

        let mut estimates = AnalystEstimates {
            symbol,
            name: field::str_field(data, "name"),
            currency: field::str_field(data, "earnings_currency")
                .unwrap_or_else(|| "USD".to_string()),
            quarterly_eps_estimates: estimate_list(data, "quarterly_earnings_estimate"),
            annual_eps_estimates: estimate_list(data, "yearly_earnings_estimate"),
            quarterly_revenue_estimates: estimate_list(data, "quarterly_revenue_estimate"),
            annual_revenue_estimates: estimate_list(data, "yearly_revenue_estimate"),
            price_target: data
                .get("price_target")
                .filter(|v| v.is_object())
                .map(AnalystTarget::from_response),
            recommendation_trends: data
                .get("recommendation_trend")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(RecommendationTrend::from_response).collect())
                .unwrap_or_default(),
            last_updated: field::str_field(data, "last_updated"),
        };
        estimates.sort_by_end_date();
        Ok(estimates)
    }

    // Most recent period first; unparseable dates sink to the end.
    fn sort_by_end_date(&mut self) {
        for list in [
            &mut self.quarterly_eps_estimates,
            &mut self.annual_eps_estimates,
            &mut self.quarterly_revenue_estimates,
            &mut self.annual_revenue_estimates,
        ] {
            list.sort_by_key(|e| {
                std::cmp::Reverse(
                    field::parse_datetime(&e.period_end_date)
                        .unwrap_or(chrono::NaiveDateTime::MIN),
                )
            });
        }
    }
}

fn estimate_list(data: &Value, key: &str) -> Vec<Estimate> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(Estimate::from_response).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_and_sorts_estimates() {
        let estimates = AnalystEstimates::from_response(&json!({
            "symbol": "AAPL",
            "earnings_currency": "USD",
            "quarterly_earnings_estimate": [
                {"period": "Q1 2025", "end_date": "2025-03-31", "estimate_value": "1.62",
                 "number_analyst_estimates": 24},
                {"period": "Q2 2025", "end_date": "2025-06-30", "estimate_value": "1.48",
                 "number_analyst_estimates": 22}
            ]
        }))
        .unwrap();
        assert_eq!(estimates.quarterly_eps_estimates[0].period, "Q2 2025");
        assert_eq!(
            estimates.quarterly_eps_estimates[1].estimate_value,
            Some(1.62)
        );
    }

    #[test]
    fn period_label_includes_end_date() {
        let estimate = Estimate {
            period: "Q1 2025".to_string(),
            period_end_date: "2025-03-31".to_string(),
            estimate_value: Some(1.62),
            estimate_count: 24,
            actual_value: None,
            surprise_value: None,
            surprise_percent: None,
        };
        assert_eq!(estimate.period_label(), "Q1 2025 (ending Mar 31, 2025)");
    }

    #[test]
    fn trend_uses_inverted_scale() {
        let trend = RecommendationTrend::from_response(&json!({
            "period": "Current",
            "strong_buy": 20, "buy": 10, "hold": 2, "sell": 0, "strong_sell": 0
        }));
        assert_eq!(trend.total_analysts, 32);
        // (100 + 40 + 6) / 32
        assert!((trend.score - 4.5625).abs() < 0.001);
        assert_eq!(trend.recommendation_label(), "Strong Buy");
    }

    #[test]
    fn empty_trend_is_na() {
        let trend = RecommendationTrend::from_response(&json!({"period": "Current"}));
        assert_eq!(trend.recommendation_label(), "N/A");
        assert_eq!(trend.score, 0.0);
    }

    #[test]
    fn price_target_parses_counts() {
        let target = AnalystTarget::from_response(&json!({
            "mean_target": "252.5", "median_target": "255", "high_target": "300",
            "low_target": "180", "number_of_analysts": 41
        }));
        assert_eq!(target.mean_target, Some(252.5));
        assert_eq!(target.analyst_count, 41);
    }
}
