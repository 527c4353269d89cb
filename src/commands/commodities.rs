use anyhow::Result;

use crate::api::{ListFilters, TwelveDataClient};
use crate::cli::CommoditiesCommand;
use crate::commands::{apply_limit, matches_search};
use crate::display::markets::{
    print_commodity_groups, print_commodity_pairs, print_commodity_pairs_detailed,
};
use crate::export::{export_listing, report_written, ExportArgs};
use crate::models::{CommodityGroup, CommodityPair};

pub async fn run(client: &TwelveDataClient, command: CommoditiesCommand) -> Result<()> {
    match command {
        CommoditiesCommand::List {
            group,
            search,
            limit,
            detailed,
            export,
        } => list(client, group, search, limit, detailed, export).await,
        CommoditiesCommand::Groups { export } => groups(export),
        CommoditiesCommand::PreciousMetals { limit, export } => {
            list(
                client,
                Some("precious_metals".to_string()),
                None,
                limit,
                false,
                export,
            )
            .await
        }
        CommoditiesCommand::Energy { limit, export } => {
            list(client, Some("energy".to_string()), None, limit, false, export).await
        }
        CommoditiesCommand::Agriculture { limit, export } => {
            list(
                client,
                Some("agriculture".to_string()),
                None,
                limit,
                false,
                export,
            )
            .await
        }
    }
}

async fn list(
    client: &TwelveDataClient,
    group: Option<String>,
    search: Option<String>,
    limit: usize,
    detailed: bool,
    export: ExportArgs,
) -> Result<()> {
    let payload = client.commodities(&ListFilters::default()).await?;
    let mut pairs = CommodityPair::list_from_response(&payload);
    if let Some(group) = &group {
        pairs.retain(|p| {
            p.commodity_group
                .as_deref()
                .map(|g| g.eq_ignore_ascii_case(group))
                .unwrap_or(false)
        });
    }
    if let Some(needle) = &search {
        pairs.retain(|p| matches_search(needle, &[&p.symbol, &p.base_commodity]));
    }
    let (pairs, total) = apply_limit(pairs, limit);
    if detailed {
        print_commodity_pairs_detailed(&pairs);
    } else {
        print_commodity_pairs(&pairs, total);
    }

    let prefix = group.as_deref().unwrap_or("commodities").to_string();
    let written = export_listing(&export, &prefix, &[], &pairs)?;
    report_written(&written);
    Ok(())
}

fn groups(export: ExportArgs) -> Result<()> {
    let groups = CommodityGroup::all();
    print_commodity_groups(&groups);
    let written = export_listing(&export, "commodity_groups", &[], &groups)?;
    report_written(&written);
    Ok(())
}
