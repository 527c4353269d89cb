use anyhow::Result;

use crate::api::{ListFilters, TwelveDataClient};
use crate::cli::{BondsCommand, FilterArgs};
use crate::commands::{apply_limit, matches_search};
use crate::display::funds::{print_bond_types, print_bonds, print_bonds_detailed};
use crate::export::{export_listing, report_written, ExportArgs};
use crate::models::Bond;

pub async fn run(client: &TwelveDataClient, command: BondsCommand) -> Result<()> {
    match command {
        BondsCommand::List {
            filters,
            detailed,
            export,
        } => list(client, filters, export, detailed, None).await,
        BondsCommand::Government { filters, export } => {
            list(client, filters, export, false, Some(true)).await
        }
        BondsCommand::Corporate { filters, export } => {
            list(client, filters, export, false, Some(false)).await
        }
        BondsCommand::Types { filters, export } => types(client, filters, export).await,
    }
}

async fn fetch(client: &TwelveDataClient, filters: &FilterArgs) -> Result<Vec<Bond>> {
    let list_filters = ListFilters {
        exchange: filters.exchange.clone(),
        instrument_type: filters.instrument_type.clone(),
        country: filters.country.clone(),
        ..ListFilters::default()
    };
    let payload = client.bonds(&list_filters).await?;
    let mut bonds = Bond::list_from_response(&payload);
    if let Some(needle) = &filters.search {
        bonds.retain(|b| matches_search(needle, &[&b.symbol, &b.name]));
    }
    Ok(bonds)
}

async fn list(
    client: &TwelveDataClient,
    filters: FilterArgs,
    export: ExportArgs,
    detailed: bool,
    government: Option<bool>,
) -> Result<()> {
    let mut bonds = fetch(client, &filters).await?;
    if let Some(want_government) = government {
        bonds.retain(|b| b.is_government() == want_government);
    }
    let (bonds, total) = apply_limit(bonds, filters.limit);
    if detailed {
        print_bonds_detailed(&bonds);
    } else {
        print_bonds(&bonds, total);
    }

    let prefix = match government {
        Some(true) => "government_bonds",
        Some(false) => "corporate_bonds",
        None => "bonds",
    };
    let written = export_listing(&export, prefix, &[], &bonds)?;
    report_written(&written);
    Ok(())
}

async fn types(client: &TwelveDataClient, filters: FilterArgs, export: ExportArgs) -> Result<()> {
    let bonds = fetch(client, &filters).await?;
    print_bond_types(&bonds);
    let written = export_listing(&export, "bond_types", &[], &bonds)?;
    report_written(&written);
    Ok(())
}
