//! Forex and crypto handlers. Both families share the pair-listing shape,
//! so they live together.

use anyhow::Result;

use crate::api::{ListFilters, TwelveDataClient};
use crate::cli::{CryptoCommand, ForexCommand, PairFilterArgs};
use crate::commands::{apply_limit, matches_search};
use crate::display::markets::{
    print_crypto_exchanges, print_crypto_pairs, print_currencies, print_exchange_rate,
    print_forex_pairs,
};
use crate::export::{export_document, export_listing, report_written, ExportArgs};
use crate::models::{Currency, CryptoExchange, CryptoPair, ExchangeRate, ForexPair};

fn pair_filters(filters: &PairFilterArgs) -> ListFilters {
    ListFilters {
        currency_base: filters.base.clone(),
        currency_quote: filters.quote.clone(),
        ..ListFilters::default()
    }
}

pub async fn run_forex(client: &TwelveDataClient, command: ForexCommand) -> Result<()> {
    match command {
        ForexCommand::Pairs { filters, export } => forex_pairs(client, filters, export).await,
        ForexCommand::Currencies { export } => currencies(client, export).await,
        ForexCommand::Rate { symbol, export } => rate(client, &symbol, export).await,
    }
}

async fn forex_pairs(
    client: &TwelveDataClient,
    filters: PairFilterArgs,
    export: ExportArgs,
) -> Result<()> {
    let payload = client.forex_pairs(&pair_filters(&filters)).await?;
    let mut pairs = ForexPair::list_from_response(&payload);
    if let Some(needle) = &filters.search {
        pairs.retain(|p| matches_search(needle, &[&p.symbol]));
    }
    let (pairs, total) = apply_limit(pairs, filters.limit);
    print_forex_pairs(&pairs, total);
    let written = export_listing(&export, "forex_pairs", &[], &pairs)?;
    report_written(&written);
    Ok(())
}

async fn currencies(client: &TwelveDataClient, export: ExportArgs) -> Result<()> {
    let payload = client.currencies().await?;
    let currencies = Currency::list_from_response(&payload);
    let total = currencies.len();
    print_currencies(&currencies, total);
    let written = export_listing(&export, "currencies", &[], &currencies)?;
    report_written(&written);
    Ok(())
}

async fn rate(client: &TwelveDataClient, symbol: &str, export: ExportArgs) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let payload = client.exchange_rate(&symbol).await?;
    let rate = ExchangeRate::from_response(&payload)?;
    print_exchange_rate(&rate);
    let written = export_document(&export, "exchange_rate", &[symbol], &rate, None)?;
    report_written(&written);
    Ok(())
}

pub async fn run_crypto(client: &TwelveDataClient, command: CryptoCommand) -> Result<()> {
    match command {
        CryptoCommand::List {
            filters,
            exchange,
            export,
        } => crypto_list(client, filters, exchange, export).await,
        CryptoCommand::Exchanges { export } => crypto_exchanges(client, export).await,
    }
}

async fn crypto_list(
    client: &TwelveDataClient,
    filters: PairFilterArgs,
    exchange: Option<String>,
    export: ExportArgs,
) -> Result<()> {
    let payload = client.cryptocurrencies(&pair_filters(&filters)).await?;
    let mut pairs = CryptoPair::list_from_response(&payload);
    if let Some(needle) = &filters.search {
        pairs.retain(|p| matches_search(needle, &[&p.symbol]));
    }
    if let Some(venue) = &exchange {
        pairs.retain(|p| {
            p.available_exchanges
                .iter()
                .any(|e| e.eq_ignore_ascii_case(venue))
        });
    }
    let (pairs, total) = apply_limit(pairs, filters.limit);
    print_crypto_pairs(&pairs, total);
    let written = export_listing(&export, "crypto_pairs", &[], &pairs)?;
    report_written(&written);
    Ok(())
}

async fn crypto_exchanges(client: &TwelveDataClient, export: ExportArgs) -> Result<()> {
    let payload = client.crypto_exchanges().await?;
    let exchanges = CryptoExchange::list_from_response(&payload);
    print_crypto_exchanges(&exchanges);
    let written = export_listing(&export, "crypto_exchanges", &[], &exchanges)?;
    report_written(&written);
    Ok(())
}
