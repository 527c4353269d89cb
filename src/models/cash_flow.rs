use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::statement::{items_from_keys, LineItem, Section};
use crate::models::ParseError;

const OPERATING_KEYS: &[(&str, &str)] = &[
    ("Net Income", "net_income"),
    ("Depreciation and Amortization", "depreciation_and_amortization"),
    ("Deferred Income Taxes", "deferred_income_tax"),
    ("Stock-based Compensation", "stock_based_compensation"),
    ("Change in Working Capital", "change_in_working_capital"),
    ("Accounts Receivable", "accounts_receivable"),
    ("Inventory", "inventory"),
    ("Accounts Payable", "accounts_payable"),
    ("Other Working Capital", "other_working_capital"),
    ("Other Non-Cash Items", "other_non_cash_items"),
];

// The vendor misspells "activities" in two investing/financing keys; those
// spellings are what actually arrives on the wire.
const INVESTING_KEYS: &[(&str, &str)] = &[
    ("Capital Expenditure", "capital_expenditure"),
    ("Acquisitions, Net", "acquisitions_net"),
    ("Purchases of Investments", "purchases_of_investments"),
    ("Sales/Maturities of Investments", "sales_maturities_of_investments"),
    ("Other Investing Activities", "other_investing_activites"),
];

const FINANCING_KEYS: &[(&str, &str)] = &[
    ("Debt Repayment", "debt_repayment"),
    ("Common Stock Issued", "common_stock_issued"),
    ("Common Stock Repurchased", "common_stock_repurchased"),
    ("Dividends Paid", "dividends_paid"),
    ("Other Financing Activities", "other_financing_activities"),
];

/// Direction of a cash flow line, classified by sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Inflow,
    Outflow,
    Neutral,
}

impl FlowType {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            FlowType::Inflow
        } else if value < 0.0 {
            FlowType::Outflow
        } else {
            FlowType::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowType::Inflow => "Inflow",
            FlowType::Outflow => "Outflow",
            FlowType::Neutral => "Neutral",
        }
    }
}

/// A company cash flow statement for one fiscal period.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlow {
    pub symbol: String,
    pub fiscal_date: String,
    pub fiscal_period: String,
    pub currency: String,
    pub operating_activities: Section,
    pub investing_activities: Section,
    pub financing_activities: Section,
    pub beginning_cash: LineItem,
    pub ending_cash: LineItem,
    pub net_change_in_cash: LineItem,
    pub free_cash_flow: LineItem,
}

impl CashFlow {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        if !data.is_object() {
            return Err(ParseError::UnexpectedShape("cash flow is not an object"));
        }

        let operating_activities = Section::new(
            "Operating Activities",
            items_from_keys(data, OPERATING_KEYS, None),
            Some(LineItem::from_value(
                "Net Cash from Operating Activities",
                data.get("net_cash_provided_by_operating_activities"),
                None,
            )),
        );
        let investing_activities = Section::new(
            "Investing Activities",
            items_from_keys(data, INVESTING_KEYS, None),
            Some(LineItem::from_value(
                "Net Cash from Investing Activities",
                data.get("net_cash_used_for_investing_activites"),
                None,
            )),
        );
        let financing_activities = Section::new(
            "Financing Activities",
            items_from_keys(data, FINANCING_KEYS, None),
            Some(LineItem::from_value(
                "Net Cash from Financing Activities",
                data.get("net_cash_used_provided_by_financing_activities"),
                None,
            )),
        );

        let beginning_cash = LineItem::from_value(
            "Cash at Beginning of Period",
            data.get("beginning_cash_position"),
            None,
        );
        let ending_cash = LineItem::from_value(
            "Cash at End of Period",
            data.get("ending_cash_position"),
            None,
        );
        let net_change_in_cash = LineItem::new(
            "Net Change in Cash",
            ending_cash.value - beginning_cash.value,
        );

        let free_cash_flow = match data.get("free_cash_flow") {
            Some(v) if !v.is_null() => LineItem::from_value("Free Cash Flow", Some(v), None),
            // Derive from operating cash and capex when absent; capex
            // arrives negative, so this is an addition.
            _ => {
                let capex = operating_capex(&investing_activities);
                match capex {
                    Some(capex_value) => LineItem::new(
                        "Free Cash Flow",
                        operating_activities.value() + capex_value,
                    ),
                    None => LineItem::absent("Free Cash Flow"),
                }
            }
        };

        Ok(CashFlow {
            symbol: field::str_field(data, "symbol").unwrap_or_default(),
            fiscal_date: field::str_field(data, "fiscal_date").unwrap_or_default(),
            fiscal_period: field::str_field(data, "fiscal_period").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            operating_activities,
            investing_activities,
            financing_activities,
            beginning_cash,
            ending_cash,
            net_change_in_cash,
            free_cash_flow,
        })
    }

    pub fn flow_type(item: &LineItem) -> FlowType {
        FlowType::of(item.value)
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
        ];
        for section in [
            &self.operating_activities,
            &self.investing_activities,
            &self.financing_activities,
        ] {
            rows.extend(section_rows(section));
            rows.push(blank.clone());
        }
        for item in [
            &self.beginning_cash,
            &self.ending_cash,
            &self.net_change_in_cash,
            &self.free_cash_flow,
        ] {
            rows.push(flow_row(item));
        }
        rows
    }
}

fn operating_capex(investing: &Section) -> Option<f64> {
    investing
        .items
        .iter()
        .find(|i| i.name == "Capital Expenditure")
        .map(|i| i.value)
}

fn flow_row(item: &LineItem) -> Vec<String> {
    vec![
        item.name.clone(),
        item.value_str.clone(),
        FlowType::of(item.value).label().to_string(),
    ]
}

fn section_rows(section: &Section) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        format!("--- {} ---", section.name),
        String::new(),
        String::new(),
    ]];
    for item in &section.items {
        rows.push(flow_row(item));
    }
    rows.push(flow_row(&section.total));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_cash_flow() -> Value {
        json!({
            "symbol": "AAPL",
            "fiscal_date": "2024-09-28",
            "fiscal_period": "FY",
            "currency": "USD",
            "net_income": "93736000000",
            "depreciation_and_amortization": "11445000000",
            "net_cash_provided_by_operating_activities": "118254000000",
            "capital_expenditure": "-9447000000",
            "other_investing_activites": "1308000000",
            "net_cash_used_for_investing_activites": "2935000000",
            "dividends_paid": "-15234000000",
            "common_stock_repurchased": "-94949000000",
            "net_cash_used_provided_by_financing_activities": "-121983000000",
            "beginning_cash_position": "30737000000",
            "ending_cash_position": "29943000000"
        })
    }

    #[test]
    fn classifies_flow_direction_by_sign() {
        assert_eq!(FlowType::of(5.0), FlowType::Inflow);
        assert_eq!(FlowType::of(-5.0), FlowType::Outflow);
        assert_eq!(FlowType::of(0.0), FlowType::Neutral);
    }

    #[test]
    fn net_change_is_ending_minus_beginning() {
        let cf = CashFlow::from_response(&sample_cash_flow()).unwrap();
        assert_eq!(cf.net_change_in_cash.value, -794_000_000.0);
        assert_eq!(CashFlow::flow_type(&cf.net_change_in_cash), FlowType::Outflow);
    }

    #[test]
    fn derives_free_cash_flow_from_capex() {
        let cf = CashFlow::from_response(&sample_cash_flow()).unwrap();
        // operating total + (negative) capex
        assert_eq!(cf.free_cash_flow.value, 118_254_000_000.0 - 9_447_000_000.0);
    }

    #[test]
    fn vendor_free_cash_flow_wins() {
        let mut data = sample_cash_flow();
        data["free_cash_flow"] = json!("111000000000");
        let cf = CashFlow::from_response(&data).unwrap();
        assert_eq!(cf.free_cash_flow.value, 111_000_000_000.0);
    }

    #[test]
    fn missing_capex_leaves_fcf_na() {
        let cf = CashFlow::from_response(&json!({
            "symbol": "X",
            "net_cash_provided_by_operating_activities": "100"
        }))
        .unwrap();
        assert_eq!(cf.free_cash_flow.value_str, "N/A");
    }

    #[test]
    fn misspelled_vendor_keys_are_read() {
        let cf = CashFlow::from_response(&sample_cash_flow()).unwrap();
        assert_eq!(cf.investing_activities.value(), 2_935_000_000.0);
        assert!(cf
            .investing_activities
            .items
            .iter()
            .any(|i| i.name == "Other Investing Activities"));
    }
}
