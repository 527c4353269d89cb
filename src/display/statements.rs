use comfy_table::{Attribute, Cell, Table};

use crate::display::{kv_row, kv_table, listing_table};
use crate::models::cash_flow::FlowType;
use crate::models::statement::{LineItem, Section};
use crate::models::{BalanceSheet, CashFlow, IncomeStatement};

fn header_block(symbol: &str, fiscal_date: &str, fiscal_period: &str, currency: &str) {
    let mut table = kv_table();
    kv_row(&mut table, "Symbol", symbol);
    kv_row(&mut table, "Fiscal Date", fiscal_date);
    kv_row(&mut table, "Fiscal Period", fiscal_period);
    kv_row(&mut table, "Currency", currency);
    println!("{table}");
}

fn item_row(table: &mut Table, item: &LineItem, indent: bool) {
    let name = if indent {
        format!("  {}", item.name)
    } else {
        item.name.clone()
    };
    table.add_row(vec![
        Cell::new(name),
        Cell::new(&item.value_str),
        Cell::new(&item.percentage_str),
    ]);
}

fn total_row(table: &mut Table, item: &LineItem) {
    table.add_row(vec![
        Cell::new(&item.name).add_attribute(Attribute::Bold),
        Cell::new(&item.value_str).add_attribute(Attribute::Bold),
        Cell::new(&item.percentage_str),
    ]);
}

fn section_rows(table: &mut Table, section: &Section) {
    table.add_row(vec![
        Cell::new(&section.name).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
    ]);
    for item in &section.items {
        item_row(table, item, true);
    }
    total_row(table, &section.total);
}

pub fn print_income_statement(statement: &IncomeStatement) {
    header_block(
        &statement.symbol,
        &statement.fiscal_date,
        &statement.fiscal_period,
        &statement.currency,
    );

    let mut table = listing_table(&["Line Item", "Amount", "% of Revenue"]);
    item_row(&mut table, &statement.revenue, false);
    item_row(&mut table, &statement.cost_of_revenue, false);
    total_row(&mut table, &statement.gross_profit);
    for item in &statement.operating_expenses {
        item_row(&mut table, item, true);
    }
    total_row(&mut table, &statement.total_operating_expenses);
    total_row(&mut table, &statement.operating_income);
    for item in &statement.non_operating_items {
        item_row(&mut table, item, true);
    }
    item_row(&mut table, &statement.income_before_tax, false);
    item_row(&mut table, &statement.income_tax, false);
    total_row(&mut table, &statement.net_income);
    item_row(&mut table, &statement.eps_basic, false);
    item_row(&mut table, &statement.eps_diluted, false);
    println!("{table}");

    let fmt = |m: Option<f64>| {
        m.map(|v| format!("{v:.2}%"))
            .unwrap_or_else(|| "N/A".to_string())
    };
    println!(
        "Margins: gross {}, operating {}, net {}",
        fmt(statement.gross_margin()),
        fmt(statement.operating_margin()),
        fmt(statement.net_margin())
    );
}

/// Operating expense lines only, each with its share of revenue.
pub fn print_expense_breakdown(statement: &IncomeStatement) {
    header_block(
        &statement.symbol,
        &statement.fiscal_date,
        &statement.fiscal_period,
        &statement.currency,
    );
    let mut table = listing_table(&["Expense", "Amount", "% of Revenue"]);
    item_row(&mut table, &statement.cost_of_revenue, false);
    for item in &statement.operating_expenses {
        item_row(&mut table, item, false);
    }
    total_row(&mut table, &statement.total_operating_expenses);
    println!("{table}");
}

pub fn print_balance_sheet(sheet: &BalanceSheet) {
    header_block(
        &sheet.symbol,
        &sheet.fiscal_date,
        &sheet.fiscal_period,
        &sheet.currency,
    );

    let mut table = listing_table(&["Line Item", "Amount", "% of Total"]);
    section_rows(&mut table, &sheet.current_assets);
    section_rows(&mut table, &sheet.non_current_assets);
    total_row(&mut table, &sheet.total_assets);
    section_rows(&mut table, &sheet.current_liabilities);
    section_rows(&mut table, &sheet.non_current_liabilities);
    total_row(&mut table, &sheet.total_liabilities);
    section_rows(&mut table, &sheet.shareholders_equity);
    total_row(&mut table, &sheet.total_liabilities_and_equity);
    println!("{table}");

    let mut ratios = listing_table(&["Ratio", "Value"]);
    for ratio in [&sheet.current_ratio, &sheet.debt_to_equity, &sheet.debt_ratio] {
        ratios.add_row(vec![ratio.name.clone(), ratio.value_str.clone()]);
    }
    println!("{ratios}");
}

/// Side-by-side table of key metrics across fiscal periods, one column
/// per period, built from prebuilt rows so the three statement kinds
/// share one renderer.
pub fn print_statement_comparison(
    symbol: &str,
    title: &str,
    headers: &[String],
    rows: &[Vec<String>],
) {
    println!("{title} for {symbol} across {} periods", headers.len() - 1);
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let mut table = listing_table(&header_refs);
    for row in rows {
        table.add_row(row.clone());
    }
    println!("{table}");
}

pub fn print_cash_flow(cash_flow: &CashFlow) {
    header_block(
        &cash_flow.symbol,
        &cash_flow.fiscal_date,
        &cash_flow.fiscal_period,
        &cash_flow.currency,
    );

    let mut table = listing_table(&["Line Item", "Amount", "Direction"]);
    for section in [
        &cash_flow.operating_activities,
        &cash_flow.investing_activities,
        &cash_flow.financing_activities,
    ] {
        table.add_row(vec![
            Cell::new(&section.name).add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
        ]);
        for item in &section.items {
            flow_row(&mut table, item, true);
        }
        flow_total_row(&mut table, &section.total);
    }
    for item in [
        &cash_flow.beginning_cash,
        &cash_flow.ending_cash,
        &cash_flow.net_change_in_cash,
        &cash_flow.free_cash_flow,
    ] {
        flow_total_row(&mut table, item);
    }
    println!("{table}");
}

fn flow_row(table: &mut Table, item: &LineItem, indent: bool) {
    let name = if indent {
        format!("  {}", item.name)
    } else {
        item.name.clone()
    };
    table.add_row(vec![
        Cell::new(name),
        Cell::new(&item.value_str),
        Cell::new(FlowType::of(item.value).label()),
    ]);
}

fn flow_total_row(table: &mut Table, item: &LineItem) {
    table.add_row(vec![
        Cell::new(&item.name).add_attribute(Attribute::Bold),
        Cell::new(&item.value_str).add_attribute(Attribute::Bold),
        Cell::new(FlowType::of(item.value).label()),
    ]);
}
