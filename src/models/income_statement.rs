use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::statement::LineItem;
use crate::models::ParseError;

const OPERATING_EXPENSE_KEYS: &[(&str, &str)] = &[
    ("Research & Development", "research_and_development_expenses"),
    (
        "Selling, General & Administrative",
        "selling_general_and_administrative_expenses",
    ),
    ("Depreciation & Amortization", "depreciation_and_amortization"),
    ("Restructuring Charges", "restructuring_charges"),
    ("Other Operating Expenses", "other_operating_expenses"),
];

const NON_OPERATING_KEYS: &[(&str, &str)] = &[
    ("Interest Expense", "interest_expense"),
    ("Interest Income", "interest_income"),
    ("Other Non-Operating Income", "other_non_operating_income"),
];

/// A company income statement for one fiscal period. Expense items carry a
/// percentage of revenue; totals and margins are derived at construction.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatement {
    pub symbol: String,
    pub fiscal_date: String,
    pub fiscal_period: String,
    pub currency: String,
    pub revenue: LineItem,
    pub cost_of_revenue: LineItem,
    pub gross_profit: LineItem,
    pub operating_expenses: Vec<LineItem>,
    pub total_operating_expenses: LineItem,
    pub operating_income: LineItem,
    pub non_operating_items: Vec<LineItem>,
    pub income_before_tax: LineItem,
    pub income_tax: LineItem,
    pub net_income: LineItem,
    pub eps_basic: LineItem,
    pub eps_diluted: LineItem,
    pub shares_basic: LineItem,
    pub shares_diluted: LineItem,
}

impl IncomeStatement {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        if !data.is_object() {
            return Err(ParseError::UnexpectedShape("income statement is not an object"));
        }

        let revenue = LineItem::from_value("Revenue", data.get("revenue"), None);
        let revenue_value = revenue.value;

        let cost_of_revenue =
            expense_item("Cost of Revenue", data.get("cost_of_revenue"), revenue_value);

        let operating_expenses: Vec<LineItem> = OPERATING_EXPENSE_KEYS
            .iter()
            .filter(|(_, key)| data.get(*key).map(|v| !v.is_null()).unwrap_or(false))
            .map(|(label, key)| expense_item(label, data.get(*key), revenue_value))
            .collect();

        let expenses_total: f64 = operating_expenses.iter().map(|i| i.value).sum();
        let total_operating_expenses =
            expense_item("Total Operating Expenses", Some(&Value::from(expenses_total)), revenue_value);

        let non_operating_items: Vec<LineItem> = NON_OPERATING_KEYS
            .iter()
            .filter(|(_, key)| data.get(*key).map(|v| !v.is_null()).unwrap_or(false))
            .map(|(label, key)| LineItem::from_value(label, data.get(*key), None))
            .collect();

        Ok(IncomeStatement {
            symbol: field::str_field(data, "symbol").unwrap_or_default(),
            fiscal_date: field::str_field(data, "fiscal_date").unwrap_or_default(),
            fiscal_period: field::str_field(data, "fiscal_period").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            revenue,
            cost_of_revenue,
            gross_profit: LineItem::from_value("Gross Profit", data.get("gross_profit"), None),
            operating_expenses,
            total_operating_expenses,
            operating_income: LineItem::from_value(
                "Operating Income",
                data.get("operating_income"),
                None,
            ),
            non_operating_items,
            income_before_tax: LineItem::from_value(
                "Income Before Tax",
                data.get("income_before_tax"),
                None,
            ),
            income_tax: LineItem::from_value(
                "Income Tax Expense",
                data.get("income_tax_expense"),
                None,
            ),
            net_income: LineItem::from_value("Net Income", data.get("net_income"), None),
            eps_basic: LineItem::from_value("EPS (Basic)", data.get("eps_basic"), None),
            eps_diluted: LineItem::from_value("EPS (Diluted)", data.get("eps_diluted"), None),
            shares_basic: LineItem::from_value(
                "Weighted Average Shares (Basic)",
                data.get("weighted_average_shares_outstanding_basic"),
                None,
            ),
            shares_diluted: LineItem::from_value(
                "Weighted Average Shares (Diluted)",
                data.get("weighted_average_shares_outstanding_diluted"),
                None,
            ),
        })
    }

    pub fn gross_margin(&self) -> Option<f64> {
        margin(self.gross_profit.value, self.revenue.value)
    }

    pub fn operating_margin(&self) -> Option<f64> {
        margin(self.operating_income.value, self.revenue.value)
    }

    pub fn net_margin(&self) -> Option<f64> {
        margin(self.net_income.value, self.revenue.value)
    }

    /// Flat rows for CSV export.
    pub fn csv_rows(&self) -> Vec<Vec<String>> {
        let blank = vec![String::new(), String::new(), String::new()];
        let mut rows = vec![
            vec!["Symbol".to_string(), self.symbol.clone(), String::new()],
            vec!["Fiscal Date".to_string(), self.fiscal_date.clone(), String::new()],
            vec!["Fiscal Period".to_string(), self.fiscal_period.clone(), String::new()],
            vec!["Currency".to_string(), self.currency.clone(), String::new()],
            blank.clone(),
            self.revenue.csv_row(),
            self.cost_of_revenue.csv_row(),
            self.gross_profit.csv_row(),
            blank.clone(),
            vec!["OPERATING EXPENSES".to_string(), String::new(), String::new()],
        ];
        for item in &self.operating_expenses {
            rows.push(item.csv_row());
        }
        rows.push(self.total_operating_expenses.csv_row());
        rows.push(self.operating_income.csv_row());
        rows.push(blank.clone());
        for item in &self.non_operating_items {
            rows.push(item.csv_row());
        }
        rows.push(self.income_before_tax.csv_row());
        rows.push(self.income_tax.csv_row());
        rows.push(self.net_income.csv_row());
        rows.push(blank);
        rows.push(self.eps_basic.csv_row());
        rows.push(self.eps_diluted.csv_row());
        rows.push(self.shares_basic.csv_row());
        rows.push(self.shares_diluted.csv_row());
        rows
    }
}

// Percentage of revenue only when revenue is positive and the value is
// non-zero.
fn expense_item(name: &str, raw: Option<&Value>, revenue: f64) -> LineItem {
    let item = LineItem::from_value(name, raw, None);
    if revenue > 0.0 && item.value != 0.0 {
        LineItem::with_share(name, item.value, Some(revenue))
    } else {
        item
    }
}

fn margin(value: f64, revenue: f64) -> Option<f64> {
    if revenue > 0.0 {
        Some(value / revenue * 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_statement() -> Value {
        json!({
            "symbol": "AAPL",
            "fiscal_date": "2024-09-28",
            "fiscal_period": "FY",
            "currency": "USD",
            "revenue": "391035000000",
            "cost_of_revenue": "210352000000",
            "gross_profit": "180683000000",
            "research_and_development_expenses": "31370000000",
            "selling_general_and_administrative_expenses": "26097000000",
            "restructuring_charges": null,
            "operating_income": "123216000000",
            "interest_expense": "3900000000",
            "income_before_tax": "123485000000",
            "income_tax_expense": "29749000000",
            "net_income": "93736000000",
            "eps_basic": "6.11",
            "eps_diluted": "6.08",
            "weighted_average_shares_outstanding_basic": "15343783000",
            "weighted_average_shares_outstanding_diluted": "15408095000"
        })
    }

    #[test]
    fn expenses_carry_share_of_revenue() {
        let statement = IncomeStatement::from_response(&sample_statement()).unwrap();
        assert_eq!(statement.operating_expenses.len(), 2);
        let rd = &statement.operating_expenses[0];
        assert!((rd.percentage.unwrap() - 8.022).abs() < 0.01);
        assert!(statement.cost_of_revenue.percentage.is_some());
    }

    #[test]
    fn totals_operating_expenses() {
        let statement = IncomeStatement::from_response(&sample_statement()).unwrap();
        assert_eq!(
            statement.total_operating_expenses.value,
            31_370_000_000.0 + 26_097_000_000.0
        );
        assert!(statement.total_operating_expenses.percentage.is_some());
    }

    #[test]
    fn computes_margins() {
        let statement = IncomeStatement::from_response(&sample_statement()).unwrap();
        assert!((statement.gross_margin().unwrap() - 46.21).abs() < 0.01);
        assert!((statement.net_margin().unwrap() - 23.97).abs() < 0.01);
    }

    #[test]
    fn zero_revenue_suppresses_percentages() {
        let statement = IncomeStatement::from_response(&json!({
            "symbol": "X",
            "revenue": "0",
            "cost_of_revenue": "10"
        }))
        .unwrap();
        assert!(statement.cost_of_revenue.percentage.is_none());
        assert!(statement.gross_margin().is_none());
    }

    #[test]
    fn null_items_render_na() {
        let statement = IncomeStatement::from_response(&json!({
            "symbol": "X",
            "net_income": null
        }))
        .unwrap();
        assert_eq!(statement.net_income.value_str, "N/A");
        assert_eq!(statement.net_income.value, 0.0);
    }
}
