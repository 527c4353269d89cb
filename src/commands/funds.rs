use anyhow::Result;

use crate::api::{ListFilters, TwelveDataClient};
use crate::cli::{FilterArgs, FundsCommand};
use crate::commands::{apply_limit, matches_search};
use crate::display::funds::{print_funds, print_mutual_fund_profile};
use crate::export::{export_document, export_listing, report_written, ExportArgs};
use crate::models::{Fund, MutualFundProfile};

pub async fn run(client: &TwelveDataClient, command: FundsCommand) -> Result<()> {
    match command {
        FundsCommand::List { filters, export } => list(client, filters, export, false).await,
        FundsCommand::Mutual { filters, export } => list(client, filters, export, true).await,
        FundsCommand::Profile { symbol, export } => profile(client, &symbol, export).await,
    }
}

async fn list(
    client: &TwelveDataClient,
    filters: FilterArgs,
    export: ExportArgs,
    mutual_only: bool,
) -> Result<()> {
    let list_filters = ListFilters {
        exchange: filters.exchange.clone(),
        instrument_type: filters.instrument_type.clone(),
        country: filters.country.clone(),
        ..ListFilters::default()
    };
    let payload = if mutual_only {
        client.mutual_funds(&list_filters).await?
    } else {
        client.funds(&list_filters).await?
    };
    let mut funds = Fund::list_from_response(&payload);
    if let Some(needle) = &filters.search {
        funds.retain(|f| matches_search(needle, &[&f.symbol, &f.name]));
    }
    let (funds, total) = apply_limit(funds, filters.limit);
    print_funds(&funds, total);

    let prefix = if mutual_only { "mutual_funds" } else { "funds" };
    let written = export_listing(&export, prefix, &[], &funds)?;
    report_written(&written);
    Ok(())
}

async fn profile(client: &TwelveDataClient, symbol: &str, export: ExportArgs) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let payload = client.mutual_fund_profile(&symbol).await?;
    let profile = MutualFundProfile::from_response(&payload)?;
    print_mutual_fund_profile(&profile);

    let written = export_document(&export, "fund_profile", &[symbol], &profile, None)?;
    report_written(&written);
    Ok(())
}
