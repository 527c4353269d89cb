use crate::display::{kv_row, kv_table, listing_table, na};
use crate::models::{EarliestTimestamp, TimeSeries};

pub fn print_time_series(series: &TimeSeries) {
    let mut meta = kv_table();
    kv_row(&mut meta, "Symbol", series.symbol.clone());
    kv_row(&mut meta, "Interval", series.interval.clone());
    kv_row(&mut meta, "Currency", series.currency.clone());
    kv_row(&mut meta, "Exchange", na(series.exchange.as_deref()));
    kv_row(&mut meta, "Type", na(series.instrument_type.as_deref()));
    println!("{meta}");

    if series.bars.is_empty() {
        println!("No bars returned for {}.", series.symbol);
        return;
    }

    let mut table = listing_table(&["Date", "Open", "High", "Low", "Close", "Volume"]);
    for bar in &series.bars {
        table.add_row(vec![
            bar.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", bar.open),
            format!("{:.2}", bar.high),
            format!("{:.2}", bar.low),
            format!("{:.2}", bar.close),
            bar.volume
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ]);
    }
    println!("{table}");
    println!("{} bars.", series.bars.len());
}

pub fn print_earliest(symbol: &str, interval: &str, earliest: &EarliestTimestamp) {
    let mut table = kv_table();
    kv_row(&mut table, "Symbol", symbol);
    kv_row(&mut table, "Interval", interval);
    kv_row(
        &mut table,
        "Earliest Data",
        earliest.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    if let Some(unix) = earliest.unix_time {
        kv_row(&mut table, "Unix Time", unix.to_string());
    }
    println!("{table}");
}
