use anyhow::Result;

use crate::api::TwelveDataClient;
use crate::cli::{AnalystsCommand, SymbolArgs};
use crate::display::analysts::{
    print_eps_revisions, print_estimates, print_growth, print_price_target, print_recommendations,
};
use crate::export::{export_document, report_written, ExportArgs};
use crate::models::{AnalystEstimates, AnalystRecommendations, AnalystTarget, EpsRevisions, GrowthEstimates};

pub async fn run(client: &TwelveDataClient, command: AnalystsCommand) -> Result<()> {
    match command {
        AnalystsCommand::Estimates(args) => estimates(client, args).await,
        AnalystsCommand::Recommendations {
            symbol,
            days,
            export,
        } => recommendations(client, &symbol, days, export).await,
        AnalystsCommand::EpsRevisions(args) => eps_revisions(client, args).await,
        AnalystsCommand::Growth(args) => growth(client, args).await,
        AnalystsCommand::PriceTarget(args) => price_target(client, args).await,
    }
}

async fn estimates(client: &TwelveDataClient, args: SymbolArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.analyst_estimates(&symbol).await?;
    let estimates = AnalystEstimates::from_response(&payload)?;
    print_estimates(&estimates);

    let written = export_document(&args.export, "analyst_estimates", &[symbol], &estimates, None)?;
    report_written(&written);
    Ok(())
}

async fn recommendations(
    client: &TwelveDataClient,
    symbol: &str,
    days: Option<i64>,
    export: ExportArgs,
) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let payload = client.recommendations(&symbol).await?;
    let mut recommendations = AnalystRecommendations::from_response(&payload)?;
    if let Some(days) = days {
        let recent: Vec<_> = recommendations
            .recent_recommendations(days)
            .into_iter()
            .cloned()
            .collect();
        recommendations.recommendations = recent;
    }
    print_recommendations(&recommendations);

    let written = export_document(
        &export,
        "recommendations",
        &[symbol],
        &recommendations,
        None,
    )?;
    report_written(&written);
    Ok(())
}

async fn eps_revisions(client: &TwelveDataClient, args: SymbolArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.eps_revisions(&symbol).await?;
    let revisions = EpsRevisions::from_response(&payload)?;
    print_eps_revisions(&revisions);

    let written = export_document(&args.export, "eps_revisions", &[symbol], &revisions, None)?;
    report_written(&written);
    Ok(())
}

async fn growth(client: &TwelveDataClient, args: SymbolArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.growth_estimates(&symbol).await?;
    let growth = GrowthEstimates::from_response(&payload)?;
    print_growth(&growth);

    let written = export_document(&args.export, "growth_estimates", &[symbol], &growth, None)?;
    report_written(&written);
    Ok(())
}

async fn price_target(client: &TwelveDataClient, args: SymbolArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.price_target(&symbol).await?;
    let target = AnalystTarget::from_response(&payload);
    print_price_target(&symbol, &target);

    let written = export_document(&args.export, "price_target", &[symbol], &target, None)?;
    report_written(&written);
    Ok(())
}
