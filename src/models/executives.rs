use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::ParseError;

/// One executive or senior manager at a company.
#[derive(Debug, Clone, Serialize)]
pub struct Executive {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

impl Executive {
    pub fn from_response(data: &Value) -> Self {
        Executive {
            name: field::str_field(data, "name").unwrap_or_default(),
            title: field::str_field(data, "title").unwrap_or_default(),
            age: field::u64_field(data, "age").map(|a| a as u32),
            pay: field::f64_field(data, "pay"),
            currency: field::str_field(data, "currency"),
            year: field::i64_field(data, "year").map(|y| y as i32),
            gender: field::str_field(data, "gender"),
            biography: field::str_field(data, "biography"),
            start_date: field::str_field(data, "start_date"),
        }
    }

    /// `"63.21M USD"` for disclosed pay, `"N/A"` otherwise.
    pub fn formatted_pay(&self) -> String {
        match self.pay {
            Some(pay) => {
                let currency = self.currency.as_deref().unwrap_or("USD");
                if pay >= 1_000_000.0 {
                    format!("{:.2}M {}", pay / 1_000_000.0, currency)
                } else {
                    format!("{pay:.0} {currency}")
                }
            }
            None => "N/A".to_string(),
        }
    }

    fn title_matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }

    fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Compensation statistics over the executives whose pay is disclosed.
#[derive(Debug, Clone, Serialize)]
pub struct CompensationSummary {
    pub disclosed: usize,
    pub total: f64,
    pub average: f64,
    pub median: f64,
    pub highest_paid: String,
    pub highest_pay: f64,
}

/// The management team of one company.
#[derive(Debug, Clone, Serialize)]
pub struct ManagementTeam {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub executives: Vec<Executive>,
}

impl ManagementTeam {
    pub fn from_response(data: &Value, symbol: &str) -> Result<Self, ParseError> {
        let executives: Vec<Executive> = data
            .get("executives")
            .and_then(Value::as_array)
            .ok_or(ParseError::UnexpectedShape("payload has no executives list"))?
            .iter()
            .filter(|e| e.is_object())
            .map(Executive::from_response)
            .collect();
        Ok(ManagementTeam {
            symbol: symbol.to_string(),
            name: field::str_field(data, "name"),
            executives,
        })
    }

    /// First executive matching the name and/or title filters. With no
    /// filters the chief executive wins, then the first listed.
    pub fn find(&self, name: Option<&str>, position: Option<&str>) -> Option<&Executive> {
        if name.is_none() && position.is_none() {
            return self.chief_executive().or_else(|| self.executives.first());
        }
        self.executives.iter().find(|e| {
            name.map_or(true, |n| e.name_matches(n))
                && position.map_or(true, |p| e.title_matches(p))
        })
    }

    pub fn chief_executive(&self) -> Option<&Executive> {
        self.executives
            .iter()
            .find(|e| e.title_matches("ceo") || e.title_matches("chief executive"))
    }

    /// Compensation statistics, `None` when no pay is disclosed.
    pub fn compensation_summary(&self) -> Option<CompensationSummary> {
        let mut paid: Vec<&Executive> = self
            .executives
            .iter()
            .filter(|e| e.pay.is_some())
            .collect();
        if paid.is_empty() {
            return None;
        }
        paid.sort_by(|a, b| {
            b.pay
                .partial_cmp(&a.pay)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let pays: Vec<f64> = paid.iter().filter_map(|e| e.pay).collect();
        let total: f64 = pays.iter().sum();
        let median = if pays.len() % 2 == 1 {
            pays[pays.len() / 2]
        } else {
            (pays[pays.len() / 2 - 1] + pays[pays.len() / 2]) / 2.0
        };

        Some(CompensationSummary {
            disclosed: paid.len(),
            total,
            average: total / pays.len() as f64,
            median,
            highest_paid: paid[0].name.clone(),
            highest_pay: pays[0],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team_payload() -> Value {
        json!({
            "name": "Apple Inc",
            "executives": [
                {"name": "Tim Cook", "title": "Chief Executive Officer",
                 "age": "63", "pay": "63210000", "currency": "USD", "year": 2023},
                {"name": "Luca Maestri", "title": "Chief Financial Officer",
                 "pay": "26940000", "currency": "USD"},
                {"name": "Katherine Adams", "title": "General Counsel",
                 "pay": "26930000", "currency": "USD"},
                {"name": "Jeff Williams", "title": "Chief Operating Officer"}
            ]
        })
    }

    #[test]
    fn maps_team_and_coerces_numbers() {
        let team = ManagementTeam::from_response(&team_payload(), "AAPL").unwrap();
        assert_eq!(team.executives.len(), 4);
        assert_eq!(team.name.as_deref(), Some("Apple Inc"));
        assert_eq!(team.executives[0].age, Some(63));
        assert_eq!(team.executives[0].formatted_pay(), "63.21M USD");
        assert_eq!(team.executives[3].formatted_pay(), "N/A");
    }

    #[test]
    fn missing_executives_list_is_an_error() {
        assert!(ManagementTeam::from_response(&json!({"name": "Apple"}), "AAPL").is_err());
    }

    #[test]
    fn find_prefers_chief_executive_without_filters() {
        let team = ManagementTeam::from_response(&team_payload(), "AAPL").unwrap();
        assert_eq!(team.find(None, None).unwrap().name, "Tim Cook");
        assert_eq!(team.find(Some("maestri"), None).unwrap().name, "Luca Maestri");
        assert_eq!(
            team.find(None, Some("operating")).unwrap().name,
            "Jeff Williams"
        );
        assert!(team.find(Some("nobody"), None).is_none());
    }

    #[test]
    fn compensation_summary_uses_disclosed_pay_only() {
        let team = ManagementTeam::from_response(&team_payload(), "AAPL").unwrap();
        let summary = team.compensation_summary().unwrap();
        assert_eq!(summary.disclosed, 3);
        assert_eq!(summary.highest_paid, "Tim Cook");
        assert_eq!(summary.highest_pay, 63_210_000.0);
        assert_eq!(summary.median, 26_940_000.0);
        assert!((summary.total - 117_080_000.0).abs() < 1.0);
    }

    #[test]
    fn no_disclosed_pay_means_no_summary() {
        let team = ManagementTeam::from_response(
            &json!({"executives": [{"name": "A", "title": "CEO"}]}),
            "X",
        )
        .unwrap();
        assert!(team.compensation_summary().is_none());
    }
}
