use anyhow::Result;
use tracing::warn;

use crate::api::TwelveDataClient;
use crate::cli::{CalendarGrouping, SplitDirection, SplitsCommand};
use crate::commands::calendar_range;
use crate::display::events::{print_split_comparison, print_split_history, print_splits_calendar};
use crate::export::{export_document, report_written, ExportArgs};
use crate::models::{SplitHistory, SplitsCalendar};

pub async fn run(client: &TwelveDataClient, command: SplitsCommand) -> Result<()> {
    match command {
        SplitsCommand::History {
            symbol,
            start,
            end,
            export,
        } => history(client, &symbol, start.as_deref(), end.as_deref(), export).await,
        SplitsCommand::Calendar {
            start,
            end,
            exchange,
            direction,
            symbol,
            group_by,
            export,
        } => {
            calendar(
                client,
                start.as_deref(),
                end.as_deref(),
                exchange.as_deref(),
                direction,
                symbol.as_deref(),
                group_by,
                export,
            )
            .await
        }
        SplitsCommand::Compare { symbols, export } => compare(client, &symbols, export).await,
    }
}

async fn fetch_history(
    client: &TwelveDataClient,
    symbol: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SplitHistory> {
    let payload = client.splits(symbol, start, end).await?;
    Ok(SplitHistory::from_response(&payload, symbol))
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
    print_split_history(&history);

    let rows: Vec<Vec<String>> = history
        .splits
        .iter()
        .map(|s| {
            vec![
                s.date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                s.split_text(),
                s.effect_description(),
            ]
        })
        .collect();
    let written = export_document(
        &export,
        "splits",
        &[symbol],
        &history,
        Some((&["Date", "Split", "Effect"], rows)),
    )?;
    report_written(&written);
    Ok(())
}

async fn calendar(
    client: &TwelveDataClient,
    start: Option<&str>,
    end: Option<&str>,
    exchange: Option<&str>,
    direction: Option<SplitDirection>,
    symbol: Option<&str>,
    group_by: CalendarGrouping,
    export: ExportArgs,
) -> Result<()> {
    let (start_date, end_date) = calendar_range(start, end)?;
    let payload = client
        .splits_calendar(&start_date.to_string(), &end_date.to_string(), exchange)
        .await?;
    let mut calendar = SplitsCalendar::from_response(&payload, start_date, end_date);
    if let Some(direction) = direction {
        let forward = direction == SplitDirection::Forward;
        calendar.events = calendar
            .filter_forward(forward)
            .into_iter()
            .cloned()
            .collect();
    }
    if let Some(symbol) = symbol {
        calendar.retain_symbol(symbol);
    }
    print_splits_calendar(&calendar, group_by);

    let rows: Vec<Vec<String>> = calendar
        .events
        .iter()
        .map(|e| {
            vec![
                e.split.symbol.clone(),
                e.split
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                e.split.split_text(),
                e.split.direction_label().to_string(),
                e.status.clone().unwrap_or_default(),
            ]
        })
        .collect();
    let written = export_document(
        &export,
        "splits_calendar",
        &[],
        &calendar,
        Some((&["Symbol", "Date", "Split", "Direction", "Status"], rows)),
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
        anyhow::bail!("no split history available for any requested symbol");
    }
    print_split_comparison(&histories);

    let symbols: Vec<String> = histories.iter().map(|h| h.symbol.clone()).collect();
    let written = export_document(&export, "split_comparison", &symbols, &histories, None)?;
    report_written(&written);
    Ok(())
}
