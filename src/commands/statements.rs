use anyhow::Result;
use serde_json::Value;

use crate::api::TwelveDataClient;
use crate::cli::{StatementArgs, StatementKind, StatementPeriod, StatementsCommand};
use crate::display::statements::{
    print_balance_sheet, print_cash_flow, print_expense_breakdown, print_income_statement,
    print_statement_comparison,
};
use crate::export::{export_document, report_written, ExportArgs};
use crate::models::{BalanceSheet, CashFlow, IncomeStatement};

pub async fn run(client: &TwelveDataClient, command: StatementsCommand) -> Result<()> {
    match command {
        StatementsCommand::Income(args) => income(client, args, false).await,
        StatementsCommand::ExpenseBreakdown(args) => income(client, args, true).await,
        StatementsCommand::BalanceSheet(args) => balance_sheet(client, args).await,
        StatementsCommand::CashFlow(args) => cash_flow(client, args).await,
        StatementsCommand::Compare {
            symbol,
            statement,
            period,
            count,
            export,
        } => compare(client, &symbol, statement, period, count, export).await,
    }
}

/// Statement payloads wrap the periods in a list under the endpoint name;
/// symbol lives in `meta`, not the entry.
fn entries<'a>(payload: &'a Value, key: &str) -> Result<Vec<&'a Value>> {
    if let Some(list) = payload.get(key).and_then(Value::as_array) {
        if !list.is_empty() {
            return Ok(list.iter().collect());
        }
    }
    if payload.is_object() && payload.get("fiscal_date").is_some() {
        return Ok(vec![payload]);
    }
    anyhow::bail!("no {key} data returned")
}

fn latest_entry<'a>(payload: &'a Value, key: &str) -> Result<&'a Value> {
    Ok(entries(payload, key)?[0])
}

fn meta_symbol(payload: &Value, fallback: &str) -> String {
    payload
        .get("meta")
        .and_then(|m| m.get("symbol"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

async fn income(client: &TwelveDataClient, args: StatementArgs, breakdown: bool) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client
        .income_statement(&symbol, args.period.as_str(), 1)
        .await?;
    let mut statement = IncomeStatement::from_response(latest_entry(&payload, "income_statement")?)?;
    if statement.symbol.is_empty() {
        statement.symbol = meta_symbol(&payload, &symbol);
    }
    if breakdown {
        print_expense_breakdown(&statement);
    } else {
        print_income_statement(&statement);
    }

    let prefix = if breakdown { "expense_breakdown" } else { "income_statement" };
    let written = export_document(
        &args.export,
        prefix,
        &[symbol],
        &statement,
        Some((&["Line Item", "Amount", "% of Revenue"], statement.csv_rows())),
    )?;
    report_written(&written);
    Ok(())
}

async fn balance_sheet(client: &TwelveDataClient, args: StatementArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.balance_sheet(&symbol, args.period.as_str(), 1).await?;
    let mut sheet = BalanceSheet::from_response(latest_entry(&payload, "balance_sheet")?)?;
    if sheet.symbol.is_empty() {
        sheet.symbol = meta_symbol(&payload, &symbol);
    }
    print_balance_sheet(&sheet);

    let written = export_document(
        &args.export,
        "balance_sheet",
        &[symbol],
        &sheet,
        Some((&["Line Item", "Amount", "% of Total"], sheet.csv_rows())),
    )?;
    report_written(&written);
    Ok(())
}

async fn cash_flow(client: &TwelveDataClient, args: StatementArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.cash_flow(&symbol, args.period.as_str(), 1).await?;
    let mut flow = CashFlow::from_response(latest_entry(&payload, "cash_flow")?)?;
    if flow.symbol.is_empty() {
        flow.symbol = meta_symbol(&payload, &symbol);
    }
    print_cash_flow(&flow);

    let written = export_document(
        &args.export,
        "cash_flow",
        &[symbol],
        &flow,
        Some((&["Line Item", "Amount", "Direction"], flow.csv_rows())),
    )?;
    report_written(&written);
    Ok(())
}

/// One statement kind for one symbol across several fiscal periods, one
/// column per period.
async fn compare(
    client: &TwelveDataClient,
    symbol: &str,
    kind: StatementKind,
    period: StatementPeriod,
    count: u32,
    export: ExportArgs,
) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let count = count.clamp(2, 20);

    let (title, prefix, headers, rows, payload) = match kind {
        StatementKind::Income => {
            let payload = client
                .income_statement(&symbol, period.as_str(), count)
                .await?;
            let statements = entries(&payload, "income_statement")?
                .into_iter()
                .map(IncomeStatement::from_response)
                .collect::<Result<Vec<_>, _>>()?;
            let (headers, rows) = income_rows(&statements);
            (
                "Income statement comparison",
                "income_statement_comparison",
                headers,
                rows,
                payload,
            )
        }
        StatementKind::BalanceSheet => {
            let payload = client.balance_sheet(&symbol, period.as_str(), count).await?;
            let sheets = entries(&payload, "balance_sheet")?
                .into_iter()
                .map(BalanceSheet::from_response)
                .collect::<Result<Vec<_>, _>>()?;
            let (headers, rows) = balance_sheet_rows(&sheets);
            (
                "Balance sheet comparison",
                "balance_sheet_comparison",
                headers,
                rows,
                payload,
            )
        }
        StatementKind::CashFlow => {
            let payload = client.cash_flow(&symbol, period.as_str(), count).await?;
            let flows = entries(&payload, "cash_flow")?
                .into_iter()
                .map(CashFlow::from_response)
                .collect::<Result<Vec<_>, _>>()?;
            let (headers, rows) = cash_flow_rows(&flows);
            (
                "Cash flow comparison",
                "cash_flow_comparison",
                headers,
                rows,
                payload,
            )
        }
    };

    print_statement_comparison(&symbol, title, &headers, &rows);

    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let written = export_document(
        &export,
        prefix,
        &[symbol],
        &payload,
        Some((&header_refs, rows)),
    )?;
    report_written(&written);
    Ok(())
}

fn metric_row<T>(name: &str, statements: &[T], get: impl Fn(&T) -> String) -> Vec<String> {
    let mut row = vec![name.to_string()];
    row.extend(statements.iter().map(get));
    row
}

fn fmt_pct(value: Option<f64>) -> String {
    value
        .map(|p| format!("{p:.2}%"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn income_rows(statements: &[IncomeStatement]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut headers = vec!["Metric".to_string()];
    headers.extend(statements.iter().map(|s| s.fiscal_date.clone()));
    let rows = vec![
        metric_row("Revenue", statements, |s| s.revenue.value_str.clone()),
        metric_row("Gross Profit", statements, |s| s.gross_profit.value_str.clone()),
        metric_row("Operating Income", statements, |s| {
            s.operating_income.value_str.clone()
        }),
        metric_row("Net Income", statements, |s| s.net_income.value_str.clone()),
        metric_row("EPS (Diluted)", statements, |s| s.eps_diluted.value_str.clone()),
        metric_row("Gross Margin", statements, |s| fmt_pct(s.gross_margin())),
        metric_row("Operating Margin", statements, |s| {
            fmt_pct(s.operating_margin())
        }),
        metric_row("Net Margin", statements, |s| fmt_pct(s.net_margin())),
    ];
    (headers, rows)
}

fn balance_sheet_rows(sheets: &[BalanceSheet]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut headers = vec!["Metric".to_string()];
    headers.extend(sheets.iter().map(|s| s.fiscal_date.clone()));
    let rows = vec![
        metric_row("Total Assets", sheets, |s| s.total_assets.value_str.clone()),
        metric_row("Total Liabilities", sheets, |s| {
            s.total_liabilities.value_str.clone()
        }),
        metric_row("Shareholders' Equity", sheets, |s| {
            s.shareholders_equity.total.value_str.clone()
        }),
        metric_row("Current Ratio", sheets, |s| s.current_ratio.value_str.clone()),
        metric_row("Debt-to-Equity", sheets, |s| s.debt_to_equity.value_str.clone()),
        metric_row("Debt Ratio", sheets, |s| s.debt_ratio.value_str.clone()),
    ];
    (headers, rows)
}

fn cash_flow_rows(flows: &[CashFlow]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut headers = vec!["Metric".to_string()];
    headers.extend(flows.iter().map(|s| s.fiscal_date.clone()));
    let rows = vec![
        metric_row("Operating Cash Flow", flows, |s| {
            s.operating_activities.total.value_str.clone()
        }),
        metric_row("Investing Cash Flow", flows, |s| {
            s.investing_activities.total.value_str.clone()
        }),
        metric_row("Financing Cash Flow", flows, |s| {
            s.financing_activities.total.value_str.clone()
        }),
        metric_row("Free Cash Flow", flows, |s| s.free_cash_flow.value_str.clone()),
        metric_row("Net Change in Cash", flows, |s| {
            s.net_change_in_cash.value_str.clone()
        }),
        metric_row("Ending Cash", flows, |s| s.ending_cash.value_str.clone()),
    ];
    (headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_keeps_every_period() {
        let payload = json!({
            "meta": {"symbol": "AAPL"},
            "income_statement": [
                {"fiscal_date": "2024-09-28", "revenue": "391035000000"},
                {"fiscal_date": "2023-09-30", "revenue": "383285000000"}
            ]
        });
        let list = entries(&payload, "income_statement").unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn entries_accepts_a_bare_statement_object() {
        let payload = json!({"fiscal_date": "2024-09-28", "revenue": "391035000000"});
        let list = entries(&payload, "income_statement").unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn entries_rejects_an_empty_payload() {
        let payload = json!({"income_statement": []});
        assert!(entries(&payload, "income_statement").is_err());
    }

    #[test]
    fn income_comparison_has_one_column_per_period() {
        let statements: Vec<IncomeStatement> = [
            json!({"fiscal_date": "2024-09-28", "revenue": "391035000000", "gross_profit": "180683000000", "net_income": "93736000000"}),
            json!({"fiscal_date": "2023-09-30", "revenue": "383285000000", "gross_profit": "169148000000", "net_income": "96995000000"}),
        ]
        .iter()
        .map(|v| IncomeStatement::from_response(v).unwrap())
        .collect();

        let (headers, rows) = income_rows(&statements);
        assert_eq!(headers, vec!["Metric", "2024-09-28", "2023-09-30"]);
        assert!(rows.iter().all(|r| r.len() == 3));
        assert_eq!(rows[0][0], "Revenue");
    }

    #[test]
    fn cash_flow_comparison_reports_free_cash_flow() {
        let flows: Vec<CashFlow> = [json!({
            "fiscal_date": "2024-09-28",
            "net_cash_provided_by_operating_activities": "118254000000",
            "capital_expenditures": "-9447000000"
        })]
        .iter()
        .map(|v| CashFlow::from_response(v).unwrap())
        .collect();

        let (headers, rows) = cash_flow_rows(&flows);
        assert_eq!(headers.len(), 2);
        assert!(rows.iter().any(|r| r[0] == "Free Cash Flow"));
    }
}
