use crate::cli::CalendarGrouping;
use crate::display::{kv_row, kv_table, listing_table, na, print_count};
use crate::models::dividend::DividendCalendarEvent;
use crate::models::{DividendCalendar, DividendHistory, SplitHistory, SplitsCalendar};

fn fmt_date(value: Option<chrono::NaiveDateTime>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn print_dividend_history(history: &DividendHistory) {
    let mut meta = kv_table();
    kv_row(&mut meta, "Symbol", history.symbol.clone());
    kv_row(&mut meta, "Name", history.name.clone());
    kv_row(&mut meta, "Exchange", history.exchange.clone());
    kv_row(&mut meta, "Currency", history.currency.clone());
    println!("{meta}");

    if history.dividends.is_empty() {
        println!("No dividends found for {}.", history.symbol);
        return;
    }

    let mut table = listing_table(&["Ex-Date", "Payment Date", "Record Date", "Amount", "Frequency"]);
    for dividend in &history.dividends {
        table.add_row(vec![
            fmt_date(dividend.ex_dividend_date),
            fmt_date(dividend.payment_date),
            fmt_date(dividend.record_date),
            format!("{:.4}", dividend.amount),
            na(dividend.frequency.as_deref()),
        ]);
    }
    println!("{table}");

    let growth = history.dividend_growth_rate();
    let mut annual = listing_table(&["Year", "Total Paid", "YoY Growth"]);
    for (year, total) in history.annual_dividends() {
        annual.add_row(vec![
            year.to_string(),
            format!("{total:.4}"),
            growth
                .get(&year)
                .map(|g| format!("{g:+.2}%"))
                .unwrap_or_else(|| "N/A".to_string()),
        ]);
    }
    println!("{annual}");
    println!(
        "Total paid: {:.4}; average per year: {:.4}",
        history.total_dividends(),
        history.average_annual_dividend()
    );
}

pub fn print_dividend_calendar(calendar: &DividendCalendar, grouping: CalendarGrouping) {
    println!(
        "Dividend calendar {} to {}",
        calendar.start_date, calendar.end_date
    );
    if calendar.events.is_empty() {
        println!("No dividend events in range.");
        return;
    }
    match grouping {
        CalendarGrouping::Date => {
            for (date, events) in calendar.events_by_date() {
                println!("{date}:");
                dividend_event_table(&events, true);
            }
        }
        CalendarGrouping::Symbol => {
            for (symbol, events) in calendar.events_by_symbol() {
                println!("{symbol}:");
                dividend_event_table(&events, false);
            }
        }
    }
    print_count(calendar.events.len(), calendar.events.len(), "events");
}

fn dividend_event_table(events: &[&DividendCalendarEvent], by_date: bool) {
    let lead = if by_date { "Symbol" } else { "Ex-Date" };
    let mut table = listing_table(&[lead, "Name", "Amount", "Yield", "Payment Date"]);
    for event in events {
        let lead = if by_date {
            event.symbol.clone()
        } else {
            fmt_date(event.ex_dividend_date)
        };
        table.add_row(vec![
            lead,
            event.name.clone(),
            format!("{:.4}", event.amount),
            event
                .yield_value
                .map(|y| format!("{y:.2}%"))
                .unwrap_or_else(|| "N/A".to_string()),
            fmt_date(event.payment_date),
        ]);
    }
    println!("{table}");
}

/// Side-by-side dividend comparison across symbols.
pub fn print_dividend_comparison(histories: &[DividendHistory]) {
    let mut table = listing_table(&[
        "Symbol", "Payments", "Total Paid", "Avg per Year", "Latest Amount",
    ]);
    for history in histories {
        table.add_row(vec![
            history.symbol.clone(),
            history.dividends.len().to_string(),
            format!("{:.4}", history.total_dividends()),
            format!("{:.4}", history.average_annual_dividend()),
            history
                .dividends
                .first()
                .map(|d| format!("{:.4}", d.amount))
                .unwrap_or_else(|| "N/A".to_string()),
        ]);
    }
    println!("{table}");
}

pub fn print_split_history(history: &SplitHistory) {
    println!(
        "Split history for {}{}",
        history.symbol,
        history
            .name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default()
    );
    if history.splits.is_empty() {
        println!("No splits found for {}.", history.symbol);
        return;
    }
    let mut table = listing_table(&["Date", "Split", "Ratio", "Effect"]);
    for split in &history.splits {
        table.add_row(vec![
            fmt_date(split.date),
            split.split_text(),
            format!("{:.4}", split.ratio),
            split.effect_description(),
        ]);
    }
    println!("{table}");

    let by_year = history.splits_by_year();
    if by_year.len() > 1 {
        let mut annual = listing_table(&["Year", "Splits", "Combined Factor"]);
        for (year, splits) in by_year {
            let factor: f64 = splits.iter().map(|s| s.ratio).product();
            annual.add_row(vec![
                year.to_string(),
                splits.len().to_string(),
                format!("{factor:.2}x"),
            ]);
        }
        println!("{annual}");
    }
    println!(
        "Cumulative split factor: {:.2}x",
        history.cumulative_split_factor(None, None)
    );
}

pub fn print_splits_calendar(calendar: &SplitsCalendar, grouping: CalendarGrouping) {
    println!(
        "Splits calendar {} to {}",
        calendar.start_date, calendar.end_date
    );
    if calendar.events.is_empty() {
        println!("No split events in range.");
        return;
    }
    match grouping {
        CalendarGrouping::Date => {
            let mut table = listing_table(&["Date", "Symbol", "Split", "Direction", "Status"]);
            for event in &calendar.events {
                table.add_row(vec![
                    fmt_date(event.split.date),
                    event.split.symbol.clone(),
                    event.split.split_text(),
                    event.split.direction_label().to_string(),
                    na(event.status.as_deref()),
                ]);
            }
            println!("{table}");
        }
        CalendarGrouping::Symbol => {
            for (symbol, events) in calendar.events_by_symbol() {
                println!("{symbol}:");
                let mut table = listing_table(&["Date", "Split", "Direction", "Status"]);
                for event in events {
                    table.add_row(vec![
                        fmt_date(event.split.date),
                        event.split.split_text(),
                        event.split.direction_label().to_string(),
                        na(event.status.as_deref()),
                    ]);
                }
                println!("{table}");
            }
        }
    }
    print_count(calendar.events.len(), calendar.events.len(), "events");
}

/// Side-by-side split comparison across symbols.
pub fn print_split_comparison(histories: &[SplitHistory]) {
    let mut table = listing_table(&["Symbol", "Splits", "Cumulative Factor", "Most Recent"]);
    for history in histories {
        table.add_row(vec![
            history.symbol.clone(),
            history.splits.len().to_string(),
            format!("{:.2}x", history.cumulative_split_factor(None, None)),
            history
                .splits
                .first()
                .map(|s| format!("{} on {}", s.split_text(), fmt_date(s.date)))
                .unwrap_or_else(|| "N/A".to_string()),
        ]);
    }
    println!("{table}");
}
