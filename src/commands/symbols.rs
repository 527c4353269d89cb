use anyhow::Result;

use crate::api::{ListFilters, TwelveDataClient};
use crate::cli::{FilterArgs, SymbolsCommand};
use crate::commands::{apply_limit, matches_search};
use crate::display::listings::{
    print_cross_listings, print_exchange_details, print_exchanges, print_instrument_types,
    print_search_results, print_symbols, print_trading_hours,
};
use crate::export::{export_document, export_listing, report_written, ExportArgs};
use crate::models::{Exchange, ExchangeSchedule, InstrumentType, Symbol};

pub async fn run(client: &TwelveDataClient, command: SymbolsCommand) -> Result<()> {
    match command {
        SymbolsCommand::List { filters, export } => list(client, filters, export).await,
        SymbolsCommand::Search { query, export } => search(client, &query, export).await,
        SymbolsCommand::Exchanges { filters, export } => exchanges(client, filters, export).await,
        SymbolsCommand::ExchangeDetails {
            exchange,
            date,
            export,
        } => {
            let schedule = fetch_schedule(client, &exchange, date.as_deref()).await?;
            print_exchange_details(&schedule);
            export_schedule(&export, "exchange_details", &schedule)
        }
        SymbolsCommand::TradingHours {
            exchange,
            date,
            export,
        } => {
            let schedule = fetch_schedule(client, &exchange, date.as_deref()).await?;
            print_trading_hours(&schedule);
            export_schedule(&export, "trading_hours", &schedule)
        }
        SymbolsCommand::InstrumentTypes { export } => instrument_types(client, export).await,
        SymbolsCommand::CrossList { symbol, export } => cross_list(client, &symbol, export).await,
    }
}

fn to_list_filters(filters: &FilterArgs) -> ListFilters {
    ListFilters {
        exchange: filters.exchange.clone(),
        instrument_type: filters.instrument_type.clone(),
        country: filters.country.clone(),
        ..ListFilters::default()
    }
}

async fn list(client: &TwelveDataClient, filters: FilterArgs, export: ExportArgs) -> Result<()> {
    let payload = client.stocks(&to_list_filters(&filters)).await?;
    let mut symbols = Symbol::list_from_response(&payload);
    if let Some(needle) = &filters.search {
        symbols.retain(|s| matches_search(needle, &[&s.symbol, &s.name]));
    }
    let (symbols, total) = apply_limit(symbols, filters.limit);
    print_symbols(&symbols, total);
    let written = export_listing(&export, "symbols", &[], &symbols)?;
    report_written(&written);
    Ok(())
}

async fn search(client: &TwelveDataClient, query: &str, export: ExportArgs) -> Result<()> {
    let payload = client.symbol_search(query).await?;
    let results = Symbol::list_from_response(&payload);
    print_search_results(&results, query);
    let written = export_listing(&export, "symbol_search", &[query.to_string()], &results)?;
    report_written(&written);
    Ok(())
}

async fn exchanges(
    client: &TwelveDataClient,
    filters: FilterArgs,
    export: ExportArgs,
) -> Result<()> {
    let payload = client.exchanges(&to_list_filters(&filters)).await?;
    let mut exchanges = Exchange::list_from_response(&payload);
    if let Some(needle) = &filters.search {
        exchanges.retain(|e| matches_search(needle, &[&e.name, &e.code]));
    }
    let (exchanges, total) = apply_limit(exchanges, filters.limit);
    print_exchanges(&exchanges, total);
    let written = export_listing(&export, "exchanges", &[], &exchanges)?;
    report_written(&written);
    Ok(())
}

async fn fetch_schedule(
    client: &TwelveDataClient,
    exchange: &str,
    date: Option<&str>,
) -> Result<ExchangeSchedule> {
    let payload = client.exchange_schedule(exchange, date).await?;
    let mut schedules = ExchangeSchedule::list_from_response(&payload);
    if schedules.is_empty() {
        // Some plans return a single object instead of a list.
        schedules.push(ExchangeSchedule::from_response(&payload)?);
    }
    let pick = schedules
        .iter()
        .position(|s| s.code.eq_ignore_ascii_case(exchange) || s.name.eq_ignore_ascii_case(exchange))
        .unwrap_or(0);
    Ok(schedules.swap_remove(pick))
}

fn export_schedule(export: &ExportArgs, prefix: &str, schedule: &ExchangeSchedule) -> Result<()> {
    let rows: Vec<Vec<String>> = schedule
        .sessions
        .iter()
        .map(|s| vec![s.session.clone(), s.open.clone(), s.close.clone()])
        .collect();
    let written = export_document(
        export,
        prefix,
        &[schedule.code.clone()],
        schedule,
        Some((&["Session", "Open", "Close"], rows)),
    )?;
    report_written(&written);
    Ok(())
}

async fn instrument_types(client: &TwelveDataClient, export: ExportArgs) -> Result<()> {
    let payload = client.instrument_types().await?;
    let types = InstrumentType::list_from_response(&payload);
    print_instrument_types(&types);
    let written = export_listing(&export, "instrument_types", &[], &types)?;
    report_written(&written);
    Ok(())
}

async fn cross_list(client: &TwelveDataClient, symbol: &str, export: ExportArgs) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let payload = client.cross_listings(&symbol).await?;
    let listings = Symbol::list_from_response(&payload);
    print_cross_listings(&listings, &symbol);
    let written = export_listing(&export, "cross_listings", &[symbol], &listings)?;
    report_written(&written);
    Ok(())
}
