//! Shared line-item machinery for the financial statement mappers.

use serde::Serialize;
use serde_json::Value;

use crate::models::field;

/// One line of a financial statement, with display strings computed at
/// construction. Null values keep a zero amount and render as "N/A".
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub name: String,
    pub value: f64,
    pub value_str: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    pub percentage_str: String,
}

impl LineItem {
    pub fn new(name: &str, value: f64) -> Self {
        LineItem {
            name: name.to_string(),
            value,
            value_str: format_amount(value),
            percentage: None,
            percentage_str: "N/A".to_string(),
        }
    }

    /// Item with a percentage of `total`, skipped when the total is zero
    /// or unknown.
    pub fn with_share(name: &str, value: f64, total: Option<f64>) -> Self {
        let percentage = match total {
            Some(t) if t != 0.0 => Some(value / t * 100.0),
            _ => None,
        };
        LineItem {
            name: name.to_string(),
            value,
            value_str: format_amount(value),
            percentage_str: percentage
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_else(|| "N/A".to_string()),
            percentage,
        }
    }

    /// Item for an absent or unusable vendor value.
    pub fn absent(name: &str) -> Self {
        LineItem {
            name: name.to_string(),
            value: 0.0,
            value_str: "N/A".to_string(),
            percentage: None,
            percentage_str: "N/A".to_string(),
        }
    }

    /// Build from a raw vendor value, degrading to [`LineItem::absent`]
    /// when it cannot be coerced to a number.
    pub fn from_value(name: &str, raw: Option<&Value>, total: Option<f64>) -> Self {
        match raw.and_then(field::coerce_f64) {
            Some(value) => LineItem::with_share(name, value, total),
            None => LineItem::absent(name),
        }
    }

    pub fn csv_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.value_str.clone(),
            self.percentage_str.clone(),
        ]
    }
}

/// A named statement section with its line items and a total.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub name: String,
    pub items: Vec<LineItem>,
    pub total: LineItem,
}

impl Section {
    /// Build a section; when no total is supplied it is the sum of items.
    pub fn new(name: &str, items: Vec<LineItem>, total: Option<LineItem>) -> Self {
        let total = total.unwrap_or_else(|| {
            LineItem::new(
                &format!("Total {}", name),
                items.iter().map(|i| i.value).sum(),
            )
        });
        Section {
            name: name.to_string(),
            items,
            total,
        }
    }

    pub fn value(&self) -> f64 {
        self.total.value
    }

    pub fn csv_rows(&self) -> Vec<Vec<String>> {
        let mut rows = vec![vec![format!("--- {} ---", self.name), String::new(), String::new()]];
        for item in &self.items {
            rows.push(item.csv_row());
        }
        rows.push(self.total.csv_row());
        rows
    }
}

/// Pick the present, non-null keys from a fixed (label, key) list and map
/// them to line items with a share of `total`.
pub fn items_from_keys(
    data: &Value,
    keys: &[(&str, &str)],
    total: Option<f64>,
) -> Vec<LineItem> {
    keys.iter()
        .filter(|(_, key)| data.get(*key).map(|v| !v.is_null()).unwrap_or(false))
        .map(|(label, key)| LineItem::from_value(label, data.get(*key), total))
        .collect()
}

/// Format a monetary amount with thousands separators, two decimals.
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{}.{}", grouped, frac_part)
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_amounts_with_separators() {
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-4500.0), "-4,500.00");
        assert_eq!(format_amount(12.0), "12.00");
        assert_eq!(format_amount(0.0), "0.00");
    }

    #[test]
    fn share_is_guarded_against_zero_totals() {
        let item = LineItem::with_share("Cash", 50.0, Some(200.0));
        assert_eq!(item.percentage, Some(25.0));
        assert_eq!(item.percentage_str, "25.00%");

        let guarded = LineItem::with_share("Cash", 50.0, Some(0.0));
        assert!(guarded.percentage.is_none());
        assert_eq!(guarded.percentage_str, "N/A");
    }

    #[test]
    fn null_values_become_absent_items() {
        let item = LineItem::from_value("Goodwill", Some(&Value::Null), Some(100.0));
        assert_eq!(item.value, 0.0);
        assert_eq!(item.value_str, "N/A");
    }

    #[test]
    fn section_total_defaults_to_item_sum() {
        let section = Section::new(
            "Current Assets",
            vec![LineItem::new("Cash", 60.0), LineItem::new("Inventory", 40.0)],
            None,
        );
        assert_eq!(section.value(), 100.0);
        assert_eq!(section.total.name, "Total Current Assets");
    }

    #[test]
    fn items_from_keys_skips_missing_and_null() {
        let data = json!({"cash": "10", "debt": null});
        let items = items_from_keys(
            &data,
            &[("Cash", "cash"), ("Debt", "debt"), ("Other", "other")],
            None,
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Cash");
    }
}
