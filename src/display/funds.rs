use std::collections::BTreeMap;

use crate::display::{fmt_f64, fmt_pct, kv_row, kv_table, listing_table, na, print_count, yes_no};
use crate::models::market_cap::format_market_cap;
use crate::models::{Bond, Etf, Fund, MutualFundProfile};

pub fn print_funds(funds: &[Fund], total: usize) {
    let mut table = listing_table(&["Symbol", "Name", "Type", "Exchange", "Country", "Currency"]);
    for fund in funds {
        table.add_row(vec![
            fund.symbol.clone(),
            fund.name.clone(),
            fund.fund_type.clone(),
            fund.exchange.clone(),
            fund.country.clone(),
            fund.currency.clone(),
        ]);
    }
    println!("{table}");
    print_count(funds.len(), total, "funds");
}

pub fn print_mutual_fund_profile(profile: &MutualFundProfile) {
    let mut table = kv_table();
    kv_row(&mut table, "Symbol", profile.fund.symbol.clone());
    kv_row(&mut table, "Name", profile.fund.name.clone());
    kv_row(&mut table, "Fund Family", na(profile.fund.fund_family.as_deref()));
    kv_row(&mut table, "Category", na(profile.fund.fund_category.as_deref()));
    kv_row(
        &mut table,
        "Inception Date",
        profile
            .inception_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(
        &mut table,
        "Total Assets",
        profile
            .total_assets
            .map(format_market_cap)
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(&mut table, "Net Expense Ratio", fmt_pct(profile.net_expense_ratio));
    kv_row(&mut table, "Gross Expense Ratio", fmt_pct(profile.gross_expense_ratio));
    kv_row(&mut table, "Management Fee", fmt_pct(profile.management_fee));
    kv_row(&mut table, "Minimum Investment", fmt_f64(profile.minimum_investment, 0));
    kv_row(&mut table, "Turnover Ratio", fmt_pct(profile.turnover_ratio));
    kv_row(&mut table, "Yield", fmt_pct(profile.yield_percentage));
    kv_row(
        &mut table,
        "Morningstar Rating",
        if profile.morningstar_rating.is_some() {
            profile.rating_stars()
        } else {
            "N/A".to_string()
        },
    );
    println!("{table}");

    if let Some(objective) = &profile.investment_objective {
        println!("Objective: {objective}");
    }
}

pub fn print_bonds(bonds: &[Bond], total: usize) {
    let mut table = listing_table(&[
        "Symbol", "Name", "Type", "Exchange", "Currency", "Coupon", "Maturity",
    ]);
    for bond in bonds {
        table.add_row(vec![
            bond.symbol.clone(),
            bond.name.clone(),
            na(bond.bond_type.as_deref()),
            bond.exchange.clone(),
            bond.currency.clone(),
            bond.coupon_rate
                .map(|c| format!("{c:.3}%"))
                .unwrap_or_else(|| "N/A".to_string()),
            na(bond.maturity_date.as_deref()),
        ]);
    }
    println!("{table}");
    print_count(bonds.len(), total, "bonds");
}

pub fn print_bonds_detailed(bonds: &[Bond]) {
    for bond in bonds {
        let mut table = kv_table();
        kv_row(&mut table, "Symbol", bond.symbol.clone());
        kv_row(&mut table, "Name", bond.name.clone());
        kv_row(&mut table, "Type", na(bond.bond_type.as_deref()));
        kv_row(&mut table, "Exchange", bond.exchange.clone());
        kv_row(&mut table, "Country", na(bond.country.as_deref()));
        kv_row(&mut table, "Currency", bond.currency.clone());
        kv_row(&mut table, "Issuer", na(bond.issuer.as_deref()));
        kv_row(
            &mut table,
            "Coupon Rate",
            bond.coupon_rate
                .map(|c| format!("{c:.3}%"))
                .unwrap_or_else(|| "N/A".to_string()),
        );
        kv_row(&mut table, "Face Value", fmt_f64(bond.face_value, 2));
        kv_row(&mut table, "Yield to Maturity", fmt_pct(bond.yield_to_maturity));
        kv_row(&mut table, "Maturity Date", na(bond.maturity_date.as_deref()));
        kv_row(&mut table, "Credit Rating", na(bond.credit_rating.as_deref()));
        kv_row(&mut table, "Callable", yes_no(bond.is_callable));
        println!("{table}");
    }
}

/// Distinct bond types with counts, "unclassified" for entries without one.
pub fn print_bond_types(bonds: &[Bond]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for bond in bonds {
        *counts
            .entry(bond.bond_type.as_deref().unwrap_or("unclassified"))
            .or_default() += 1;
    }
    let mut table = listing_table(&["Bond Type", "Count"]);
    for (bond_type, count) in counts {
        table.add_row(vec![bond_type.to_string(), count.to_string()]);
    }
    println!("{table}");
}

pub fn print_etfs(etfs: &[Etf], total: usize) {
    let mut table = listing_table(&[
        "Symbol", "Name", "Exchange", "Currency", "Expense Ratio", "Assets", "Yield",
    ]);
    for etf in etfs {
        table.add_row(vec![
            etf.symbol.clone(),
            etf.name.clone(),
            etf.exchange.clone(),
            etf.currency.clone(),
            etf.expense_ratio
                .map(|e| format!("{e:.4}%"))
                .unwrap_or_else(|| "N/A".to_string()),
            etf.managed_assets
                .map(format_market_cap)
                .unwrap_or_else(|| "N/A".to_string()),
            fmt_pct(etf.dividend_yield),
        ]);
    }
    println!("{table}");
    print_count(etfs.len(), total, "ETFs");
}

pub fn print_etfs_detailed(etfs: &[Etf]) {
    for etf in etfs {
        let mut table = kv_table();
        kv_row(&mut table, "Symbol", etf.symbol.clone());
        kv_row(&mut table, "Name", etf.name.clone());
        kv_row(&mut table, "Asset Class", na(etf.asset_class.as_deref()));
        kv_row(&mut table, "Category", na(etf.category.as_deref()));
        kv_row(&mut table, "Exchange", etf.exchange.clone());
        kv_row(&mut table, "Country", na(etf.country.as_deref()));
        kv_row(&mut table, "Currency", etf.currency.clone());
        kv_row(&mut table, "Fund Family", na(etf.fund_family.as_deref()));
        kv_row(
            &mut table,
            "Expense Ratio",
            etf.expense_ratio
                .map(|e| format!("{e:.4}%"))
                .unwrap_or_else(|| "N/A".to_string()),
        );
        kv_row(
            &mut table,
            "NAV",
            etf.nav
                .map(|n| format!("{n:.2} {}", etf.currency))
                .unwrap_or_else(|| "N/A".to_string()),
        );
        kv_row(&mut table, "Dividend Yield", fmt_pct(etf.dividend_yield));
        kv_row(
            &mut table,
            "Managed Assets",
            etf.managed_assets
                .map(format_market_cap)
                .unwrap_or_else(|| "N/A".to_string()),
        );
        kv_row(&mut table, "Benchmark", na(etf.benchmark.as_deref()));
        kv_row(&mut table, "Inception Date", na(etf.inception_date.as_deref()));
        println!("{table}");
        if let Some(description) = &etf.description {
            println!("{description}");
        }
    }
}
