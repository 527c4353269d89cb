use anyhow::Result;

use crate::api::{ListFilters, TwelveDataClient};
use crate::cli::{EtfsCommand, FilterArgs};
use crate::commands::{apply_limit, matches_search};
use crate::display::funds::{print_etfs, print_etfs_detailed};
use crate::export::{export_document, export_listing, report_written, ExportArgs};
use crate::models::{Etf, EtfSortKey};

pub async fn run(client: &TwelveDataClient, command: EtfsCommand) -> Result<()> {
    match command {
        EtfsCommand::List {
            filters,
            sort_by,
            descending,
            detailed,
            export,
        } => list(client, filters, sort_by, descending, detailed, export).await,
        EtfsCommand::Info { symbol, export } => info(client, &symbol, export).await,
    }
}

async fn list(
    client: &TwelveDataClient,
    filters: FilterArgs,
    sort_by: Option<EtfSortKey>,
    descending: bool,
    detailed: bool,
    export: ExportArgs,
) -> Result<()> {
    let list_filters = ListFilters {
        exchange: filters.exchange.clone(),
        instrument_type: filters.instrument_type.clone(),
        country: filters.country.clone(),
        ..ListFilters::default()
    };
    let payload = client.etfs(&list_filters).await?;
    let mut etfs = Etf::list_from_response(&payload);
    if let Some(needle) = &filters.search {
        etfs.retain(|e| matches_search(needle, &[&e.symbol, &e.name]));
    }
    if let Some(key) = sort_by {
        Etf::sort_by_key(&mut etfs, key, descending);
    }
    let (etfs, total) = apply_limit(etfs, filters.limit);
    if detailed {
        print_etfs_detailed(&etfs);
    } else {
        print_etfs(&etfs, total);
    }

    let written = export_listing(&export, "etfs", &[], &etfs)?;
    report_written(&written);
    Ok(())
}

async fn info(client: &TwelveDataClient, symbol: &str, export: ExportArgs) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let payload = client.etf_profile(&symbol).await?;
    // Profile payloads nest the record under `etf`, sometimes with a
    // further `summary` level.
    let detail = payload
        .get("etf")
        .map(|e| e.get("summary").unwrap_or(e))
        .unwrap_or(&payload);
    let etf = Etf::from_response(detail)?;
    print_etfs_detailed(std::slice::from_ref(&etf));

    let written = export_document(&export, "etf_info", &[symbol], &etf, None)?;
    report_written(&written);
    Ok(())
}
