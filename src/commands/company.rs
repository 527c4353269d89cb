use anyhow::Result;

use crate::api::TwelveDataClient;
use crate::cli::{MarketCapCommand, SymbolArgs};
use crate::display::company::{print_market_cap, print_market_cap_comparison, print_profile};
use crate::export::{export_document, report_written, CsvRecord, ExportArgs};
use crate::models::market_cap::format_market_cap;
use crate::models::{CompanyProfile, MarketCapHistory, MarketCapPoint};

pub async fn market_cap(client: &TwelveDataClient, command: MarketCapCommand) -> Result<()> {
    match command {
        MarketCapCommand::History(args) => history(client, args).await,
        MarketCapCommand::Compare {
            symbol,
            daily_count,
            monthly_count,
            export,
        } => compare(client, &symbol, daily_count, monthly_count, export).await,
    }
}

async fn history(client: &TwelveDataClient, args: SymbolArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.market_cap(&symbol, None, None).await?;
    let history = MarketCapHistory::from_response(&payload)?;
    print_market_cap(&history);

    let rows: Vec<Vec<String>> = history.points.iter().map(MarketCapPoint::row).collect();
    let written = export_document(
        &args.export,
        "market_cap",
        &[symbol],
        &history,
        Some((MarketCapPoint::headers(), rows)),
    )?;
    report_written(&written);
    Ok(())
}

/// Daily trend next to a monthly trend for the same symbol.
async fn compare(
    client: &TwelveDataClient,
    symbol: &str,
    daily_count: u32,
    monthly_count: u32,
    export: ExportArgs,
) -> Result<()> {
    let symbol = symbol.to_uppercase();
    let daily_payload = client
        .market_cap(&symbol, Some("1day"), Some(daily_count))
        .await?;
    let monthly_payload = client
        .market_cap(&symbol, Some("1month"), Some(monthly_count))
        .await?;
    let daily = MarketCapHistory::from_response(&daily_payload)?;
    let monthly = MarketCapHistory::from_response(&monthly_payload)?;
    if daily.points.is_empty() && monthly.points.is_empty() {
        anyhow::bail!("no market cap data available for {symbol}");
    }
    print_market_cap_comparison(&symbol, &daily, &monthly);

    let mut rows = Vec::new();
    for (label, history) in [("Daily", &daily), ("Monthly", &monthly)] {
        if let Some(summary) = &history.summary {
            rows.push(vec![
                label.to_string(),
                history.interval.clone(),
                history.points.len().to_string(),
                format_market_cap(summary.start_cap),
                format_market_cap(summary.end_cap),
                format!("{:+.2}%", summary.change_percent),
            ]);
        }
    }
    let written = export_document(
        &export,
        "market_cap_comparison",
        &[symbol],
        &serde_json::json!({ "daily": daily, "monthly": monthly }),
        Some((
            &["Window", "Interval", "Points", "Start", "End", "Change %"],
            rows,
        )),
    )?;
    report_written(&written);
    Ok(())
}

pub async fn profile(client: &TwelveDataClient, args: SymbolArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.profile(&symbol).await?;
    let profile = CompanyProfile::from_response(&payload)?;
    print_profile(&profile);

    let written = export_document(&args.export, "profile", &[symbol], &profile, None)?;
    report_written(&written);
    Ok(())
}
