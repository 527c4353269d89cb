use anyhow::Result;
use tracing::warn;

use crate::api::TwelveDataClient;
use crate::cli::{CalendarGrouping, DividendsCommand};
use crate::commands::calendar_range;
use crate::display::events::{
    print_dividend_calendar, print_dividend_comparison, print_dividend_history,
};
use crate::export::{export_document, report_written, CsvRecord, ExportArgs};
use crate::models::{Dividend, DividendCalendar, DividendHistory};

pub async fn run(client: &TwelveDataClient, command: DividendsCommand) -> Result<()> {
    match command {
        DividendsCommand::History {
            symbol,
            start,
            end,
            export,
        } => history(client, &symbol, start.as_deref(), end.as_deref(), export).await,
        DividendsCommand::Calendar {
            start,
            end,
            exchange,
            symbol,
            group_by,
            export,
        } => {
            calendar(
                client,
                start.as_deref(),
                end.as_deref(),
                exchange.as_deref(),
                symbol.as_deref(),
                group_by,
                export,
            )
            .await
        }
        DividendsCommand::Compare { symbols, export } => compare(client, &symbols, export).await,
    }
}

async fn fetch_history(
    client: &TwelveDataClient,
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DividendHistory> {
    let payload = client.dividends(symbol, start, end).await?;
    Ok(DividendHistory::from_response(&payload)?)
}

async fn history(
    client: &TwelveDataClient,
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
    export: ExportArgs,
) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let history = fetch_history(client, &symbol, start, end).await?;
    print_dividend_history(&history);

    let rows: Vec<Vec<String>> = history.dividends.iter().map(Dividend::row).collect();
    let written = export_document(
        &export,
        "dividends",
        &[symbol],
        &history,
        Some((Dividend::headers(), rows)),
    )?;
    report_written(&written);
    Ok(())
}

async fn calendar(
    client: &TwelveDataClient,
    start: Option<&str>,
    end: Option<&str>,
    exchange: Option<&str>,
    symbol: Option<&str>,
    group_by: CalendarGrouping,
    export: ExportArgs,
) -> Result<()> {
    let (start_date, end_date) = calendar_range(start, end)?;
    let payload = client
        .dividends_calendar(
            &start_date.to_string(),
            &end_date.to_string(),
            exchange,
        )
        .await?;
    let mut calendar = DividendCalendar::from_response(&payload, start_date, end_date);
    if let Some(symbol) = symbol {
        calendar.retain_symbol(symbol);
    }
    print_dividend_calendar(&calendar, group_by);

    let rows: Vec<Vec<String>> = calendar
        .events
        .iter()
        .map(|e| {
            let date = |d: Option<chrono::NaiveDateTime>| {
                d.map(|v| v.format("%Y-%m-%d").to_string()).unwrap_or_default()
            };
            vec![
                e.symbol.clone(),
                e.name.clone(),
                e.exchange.clone(),
                date(e.ex_dividend_date),
                date(e.payment_date),
                e.amount.to_string(),
                e.currency.clone(),
            ]
        })
        .collect();
    let written = export_document(
        &export,
        "dividend_calendar",
        &[],
        &calendar,
        Some((
            &["Symbol", "Name", "Exchange", "Ex-Dividend Date", "Payment Date", "Amount", "Currency"],
            rows,
        )),
    )?;
    report_written(&written);
    Ok(())
}

async fn compare(client: &TwelveDataClient, symbols: &[String], export: ExportArgs) -> Result<()> {
    let mut histories = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let symbol = symbol.to_uppercase();
        match fetch_history(client, &symbol, None, None).await {
            Ok(history) => histories.push(history),
            Err(e) => warn!("Skipping {}: {e:#}", symbol),
        }
    }
    if histories.is_empty() {
        anyhow::bail!("no dividend history available for any requested symbol");
    }
    print_dividend_comparison(&histories);

    let symbols: Vec<String> = histories.iter().map(|h| h.symbol.clone()).collect();
    let written = export_document(&export, "dividend_comparison", &symbols, &histories, None)?;
    report_written(&written);
    Ok(())
}
