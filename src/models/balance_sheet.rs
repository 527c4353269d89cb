use serde::Serialize;
use serde_json::Value;

use crate::models::field;
use crate::models::statement::{items_from_keys, LineItem, Section};
use crate::models::ParseError;

const CURRENT_ASSET_KEYS: &[(&str, &str)] = &[
    ("Cash and Cash Equivalents", "cash_and_cash_equivalents"),
    ("Short-term Investments", "short_term_investments"),
    ("Accounts Receivable", "accounts_receivable"),
    ("Inventory", "inventory"),
    ("Other Current Assets", "other_current_assets"),
];

const NON_CURRENT_ASSET_KEYS: &[(&str, &str)] = &[
    ("Property, Plant and Equipment", "property_plant_equipment_net"),
    ("Goodwill", "goodwill"),
    ("Intangible Assets", "intangible_assets"),
    ("Long-term Investments", "long_term_investments"),
    ("Other Non-Current Assets", "other_non_current_assets"),
];

const CURRENT_LIABILITY_KEYS: &[(&str, &str)] = &[
    ("Accounts Payable", "account_payables"),
    ("Short-term Debt", "short_term_debt"),
    (
        "Current Portion of Long-term Debt",
        "current_portion_of_long_term_debt",
    ),
    ("Deferred Revenue", "deferred_revenue"),
    ("Other Current Liabilities", "other_current_liabilities"),
];

const NON_CURRENT_LIABILITY_KEYS: &[(&str, &str)] = &[
    ("Long-term Debt", "long_term_debt"),
    ("Deferred Tax Liabilities", "deferred_tax_liabilities"),
    (
        "Pension and Other Post-Retirement Benefits",
        "pension_and_other_post_retirement_benefit",
    ),
    ("Other Non-Current Liabilities", "other_non_current_liabilities"),
];

const EQUITY_KEYS: &[(&str, &str)] = &[
    ("Common Stock", "common_stock"),
    ("Additional Paid-in Capital", "additional_paid_in_capital"),
    ("Retained Earnings", "retained_earnings"),
    ("Treasury Stock", "treasury_stock"),
    (
        "Accumulated Other Comprehensive Income",
        "accumulated_other_comprehensive_income",
    ),
];

/// A company balance sheet for one fiscal period, with sections and
/// liquidity/leverage ratios derived at construction.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    pub symbol: String,
    pub fiscal_date: String,
    pub fiscal_period: String,
    pub currency: String,
    pub current_assets: Section,
    pub non_current_assets: Section,
    pub total_assets: LineItem,
    pub current_liabilities: Section,
    pub non_current_liabilities: Section,
    pub total_liabilities: LineItem,
    pub shareholders_equity: Section,
    pub total_liabilities_and_equity: LineItem,
    pub current_ratio: LineItem,
    pub debt_to_equity: LineItem,
    pub debt_ratio: LineItem,
}

impl BalanceSheet {
    pub fn from_response(data: &Value) -> Result<Self, ParseError> {
        if !data.is_object() {
            return Err(ParseError::UnexpectedShape("balance sheet is not an object"));
        }
        let total_assets_value = field::f64_field(data, "total_assets");
        let total_liabilities_value = field::f64_field(data, "total_liabilities");

        let current_assets = Section::new(
            "Current Assets",
            items_from_keys(data, CURRENT_ASSET_KEYS, total_assets_value),
            Some(LineItem::from_value(
                "Total Current Assets",
                data.get("current_assets"),
                total_assets_value,
            )),
        );

        // Non-current total is derived: total assets minus current assets.
        let current_assets_value = field::f64_field(data, "current_assets");
        let non_current_total = match (total_assets_value, current_assets_value) {
            (Some(total), Some(current)) => {
                LineItem::with_share("Total Non-Current Assets", total - current, total_assets_value)
            }
            _ => LineItem::absent("Total Non-Current Assets"),
        };
        let non_current_assets = Section::new(
            "Non-Current Assets",
            items_from_keys(data, NON_CURRENT_ASSET_KEYS, total_assets_value),
            Some(non_current_total),
        );

        let total_assets = LineItem::from_value("Total Assets", data.get("total_assets"), None);

        let current_liabilities = Section::new(
            "Current Liabilities",
            items_from_keys(data, CURRENT_LIABILITY_KEYS, total_liabilities_value),
            Some(LineItem::from_value(
                "Total Current Liabilities",
                data.get("current_liabilities"),
                total_liabilities_value,
            )),
        );

        let current_liabilities_value = field::f64_field(data, "current_liabilities");
        let non_current_liab_total = match (total_liabilities_value, current_liabilities_value) {
            (Some(total), Some(current)) => LineItem::with_share(
                "Total Non-Current Liabilities",
                total - current,
                total_liabilities_value,
            ),
            _ => LineItem::absent("Total Non-Current Liabilities"),
        };
        let non_current_liabilities = Section::new(
            "Non-Current Liabilities",
            items_from_keys(data, NON_CURRENT_LIABILITY_KEYS, total_liabilities_value),
            Some(non_current_liab_total),
        );

        let total_liabilities = LineItem::from_value(
            "Total Liabilities",
            data.get("total_liabilities"),
            total_assets_value,
        );

        // Treasury stock is carried as a reduction of equity.
        let mut equity_items = items_from_keys(data, EQUITY_KEYS, total_assets_value);
        for item in &mut equity_items {
            if item.name == "Treasury Stock" && item.value > 0.0 {
                *item = LineItem::with_share("Treasury Stock", -item.value, total_assets_value);
            }
        }
        let shareholders_equity = Section::new(
            "Shareholders' Equity",
            equity_items,
            Some(LineItem::from_value(
                "Total Shareholders' Equity",
                data.get("total_shareholders_equity"),
                total_assets_value,
            )),
        );

        let total_liabilities_and_equity = LineItem::new(
            "Total Liabilities and Shareholders' Equity",
            total_liabilities.value + shareholders_equity.value(),
        );

        let current_ratio = ratio_item(
            "Current Ratio",
            current_assets.value(),
            current_liabilities.value(),
        );
        let debt_to_equity = ratio_item(
            "Debt to Equity Ratio",
            total_liabilities.value,
            shareholders_equity.value(),
        );
        let debt_ratio = ratio_item("Debt Ratio", total_liabilities.value, total_assets.value);

        Ok(BalanceSheet {
            symbol: field::str_field(data, "symbol").unwrap_or_default(),
            fiscal_date: field::str_field(data, "fiscal_date").unwrap_or_default(),
            fiscal_period: field::str_field(data, "fiscal_period").unwrap_or_default(),
            currency: field::str_field(data, "currency").unwrap_or_else(|| "USD".to_string()),
            current_assets,
            non_current_assets,
            total_assets,
            current_liabilities,
            non_current_liabilities,
            total_liabilities,
            shareholders_equity,
            total_liabilities_and_equity,
            current_ratio,
            debt_to_equity,
            debt_ratio,
        })
    }

    /// Flat rows for CSV export: header block, sections, totals, ratios.
    pub fn csv_rows(&self) -> Vec<Vec<String>> {
        let blank = vec![String::new(), String::new(), String::new()];
        let header =
            |label: &str| vec![label.to_string(), String::new(), String::new()];

        let mut rows = vec![
            vec!["Symbol".to_string(), self.symbol.clone(), String::new()],
            vec!["Fiscal Date".to_string(), self.fiscal_date.clone(), String::new()],
            vec!["Fiscal Period".to_string(), self.fiscal_period.clone(), String::new()],
            vec!["Currency".to_string(), self.currency.clone(), String::new()],
            blank.clone(),
            header("ASSETS"),
        ];
        rows.extend(self.current_assets.csv_rows());
        rows.extend(self.non_current_assets.csv_rows());
        rows.push(blank.clone());
        rows.push(self.total_assets.csv_row());
        rows.push(blank.clone());
        rows.push(header("LIABILITIES"));
        rows.extend(self.current_liabilities.csv_rows());
        rows.extend(self.non_current_liabilities.csv_rows());
        rows.push(blank.clone());
        rows.push(self.total_liabilities.csv_row());
        rows.push(blank.clone());
        rows.push(header("SHAREHOLDERS' EQUITY"));
        rows.extend(self.shareholders_equity.csv_rows());
        rows.push(blank.clone());
        rows.push(self.total_liabilities_and_equity.csv_row());
        rows.push(blank);
        rows.push(header("KEY FINANCIAL RATIOS"));
        rows.push(self.current_ratio.csv_row());
        rows.push(self.debt_to_equity.csv_row());
        rows.push(self.debt_ratio.csv_row());
        rows
    }
}

fn ratio_item(name: &str, numerator: f64, denominator: f64) -> LineItem {
    if denominator != 0.0 {
        LineItem::new(name, numerator / denominator)
    } else {
        LineItem::absent(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_sheet() -> Value {
        json!({
            "symbol": "AAPL",
            "fiscal_date": "2024-09-28",
            "fiscal_period": "FY",
            "currency": "USD",
            "total_assets": "364980000000",
            "current_assets": "152987000000",
            "cash_and_cash_equivalents": "29943000000",
            "inventory": "7286000000",
            "property_plant_equipment_net": "45680000000",
            "goodwill": null,
            "total_liabilities": "308030000000",
            "current_liabilities": "176392000000",
            "account_payables": "68960000000",
            "long_term_debt": "85750000000",
            "total_shareholders_equity": "56950000000",
            "common_stock": "83276000000",
            "retained_earnings": "-19154000000",
            "treasury_stock": "1000000000"
        })
    }

    #[test]
    fn builds_sections_and_ratios() {
        let sheet = BalanceSheet::from_response(&sample_sheet()).unwrap();
        assert_eq!(sheet.current_assets.items.len(), 2);
        assert_eq!(sheet.non_current_assets.items.len(), 1);

        // current ratio = 152987/176392
        assert!((sheet.current_ratio.value - 0.8673).abs() < 0.001);
        // debt to equity = 308030/56950
        assert!((sheet.debt_to_equity.value - 5.4088).abs() < 0.001);
        // debt ratio = 308030/364980
        assert!((sheet.debt_ratio.value - 0.8440).abs() < 0.001);
    }

    #[test]
    fn derives_non_current_assets_from_totals() {
        let sheet = BalanceSheet::from_response(&sample_sheet()).unwrap();
        assert_eq!(
            sheet.non_current_assets.value(),
            364_980_000_000.0 - 152_987_000_000.0
        );
    }

    #[test]
    fn treasury_stock_is_forced_negative() {
        let sheet = BalanceSheet::from_response(&sample_sheet()).unwrap();
        let treasury = sheet
            .shareholders_equity
            .items
            .iter()
            .find(|i| i.name == "Treasury Stock")
            .unwrap();
        assert_eq!(treasury.value, -1_000_000_000.0);
    }

    #[test]
    fn liabilities_plus_equity_balances() {
        let sheet = BalanceSheet::from_response(&sample_sheet()).unwrap();
        assert_eq!(
            sheet.total_liabilities_and_equity.value,
            308_030_000_000.0 + 56_950_000_000.0
        );
    }

    #[test]
    fn zero_denominators_yield_na_ratios() {
        let sheet = BalanceSheet::from_response(&json!({"symbol": "X"})).unwrap();
        assert_eq!(sheet.current_ratio.value_str, "N/A");
        assert_eq!(sheet.debt_to_equity.percentage_str, "N/A");
    }
}
