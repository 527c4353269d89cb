use crate::display::{fmt_f64, kv_row, kv_table, listing_table, na};
use crate::models::{MarketMover, Quote};

/// Summary table for one or more quotes.
pub fn print_quotes(quotes: &[Quote]) {
    let mut table = listing_table(&[
        "Symbol", "Price", "Change", "Change %", "Volume", "Currency", "Updated",
    ]);
    for quote in quotes {
        let arrow = if quote.is_gain() { "▲" } else { "▼" };
        table.add_row(vec![
            quote.symbol.clone(),
            format!("{:.2}", quote.price),
            format!("{arrow} {:+.2}", quote.change),
            format!("{:+.2}%", quote.percent_change),
            quote
                .volume
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            quote.currency.clone(),
            quote
                .timestamp
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ]);
    }
    println!("{table}");
}

/// Ranked gainers or losers table; `what` names the direction for the
/// title line.
pub fn print_market_movers(movers: &[MarketMover], what: &str) {
    if movers.is_empty() {
        println!("No {what} found for today.");
        return;
    }
    println!("Top {what} for today ({} stocks)", movers.len());
    let mut table = listing_table(&[
        "Rank", "Symbol", "Name", "Price", "Change", "Change %", "Volume", "Exchange",
    ]);
    for (rank, mover) in movers.iter().enumerate() {
        let arrow = if mover.is_gain() { "▲" } else { "▼" };
        table.add_row(vec![
            (rank + 1).to_string(),
            mover.symbol.clone(),
            na(mover.name.as_deref()),
            format!("{:.2}", mover.price),
            format!("{arrow} {:+.2}", mover.change),
            format!("{:+.2}%", mover.percent_change),
            mover
                .volume
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            na(mover.exchange.as_deref()),
        ]);
    }
    println!("{table}");
}

/// Key/value block with the full field set for one quote.
pub fn print_quote_detailed(quote: &Quote) {
    let mut table = kv_table();
    kv_row(&mut table, "Symbol", quote.symbol.clone());
    kv_row(&mut table, "Name", na(quote.name.as_deref()));
    kv_row(
        &mut table,
        "Price",
        format!("{:.2} {}", quote.price, quote.currency),
    );
    kv_row(
        &mut table,
        "Change",
        format!("{:+.2} ({:+.2}%)", quote.change, quote.percent_change),
    );
    kv_row(&mut table, "Open", fmt_f64(quote.open, 2));
    kv_row(&mut table, "High", fmt_f64(quote.high, 2));
    kv_row(&mut table, "Low", fmt_f64(quote.low, 2));
    kv_row(&mut table, "Previous Close", fmt_f64(quote.previous_close, 2));
    kv_row(
        &mut table,
        "Volume",
        quote
            .volume
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(
        &mut table,
        "52-Week Range",
        match (quote.fifty_two_week_low, quote.fifty_two_week_high) {
            (Some(low), Some(high)) => format!("{low:.2} - {high:.2}"),
            _ => "N/A".to_string(),
        },
    );
    kv_row(
        &mut table,
        "Updated",
        quote
            .timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    println!("{table}");
}
