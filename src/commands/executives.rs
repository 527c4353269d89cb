use anyhow::Result;

use crate::api::TwelveDataClient;
use crate::cli::{ExecutivesCommand, SymbolArgs};
use crate::display::company::{
    print_compensation_analysis, print_executive_profile, print_executives,
};
use crate::export::{export_document, report_written, ExportArgs};
use crate::models::{Executive, ManagementTeam};

pub async fn run(client: &TwelveDataClient, command: ExecutivesCommand) -> Result<()> {
    match command {
        ExecutivesCommand::List {
            symbol,
            detailed,
            export,
        } => list(client, &symbol, detailed, export).await,
        ExecutivesCommand::Profile {
            symbol,
            name,
            position,
            export,
        } => profile(client, &symbol, name.as_deref(), position.as_deref(), export).await,
        ExecutivesCommand::Compensation(args) => compensation(client, args).await,
    }
}

async fn fetch_team(client: &TwelveDataClient, symbol: &str) -> Result<ManagementTeam> {
    let symbol = symbol.to_uppercase();
    let payload = client.executives(&symbol).await?;
    let team = ManagementTeam::from_response(&payload, &symbol)?;
    if team.executives.is_empty() {
        anyhow::bail!("no executive data available for {symbol}");
    }
    Ok(team)
}

async fn list(
    client: &TwelveDataClient,
    symbol: &str,
    detailed: bool,
    export: ExportArgs,
) -> Result<()> {
    let team = fetch_team(client, symbol).await?;
    print_executives(&team, detailed);

    let rows: Vec<Vec<String>> = team.executives.iter().map(executive_row).collect();
    let written = export_document(
        &export,
        "executives",
        &[team.symbol.clone()],
        &team,
        Some((
            &["Name", "Title", "Age", "Compensation", "Currency", "Year", "Start Date"],
            rows,
        )),
    )?;
    report_written(&written);
    Ok(())
}

async fn profile(
    client: &TwelveDataClient,
    symbol: &str,
    name: Option<&str>,
    position: Option<&str>,
    export: ExportArgs,
) -> Result<()> {
    let team = fetch_team(client, symbol).await?;
    let Some(executive) = team.find(name, position) else {
        anyhow::bail!("no matching executive found for {}", team.symbol);
    };
    print_executive_profile(executive, team.name.as_deref());

    let written = export_document(
        &export,
        "executive_profile",
        &[team.symbol.clone()],
        executive,
        None,
    )?;
    report_written(&written);
    Ok(())
}

async fn compensation(client: &TwelveDataClient, args: SymbolArgs) -> Result<()> {
    let team = fetch_team(client, &args.symbol).await?;
    print_compensation_analysis(&team);

    if let Some(summary) = team.compensation_summary() {
        let written = export_document(
            &args.export,
            "executive_compensation",
            &[team.symbol.clone()],
            &summary,
            None,
        )?;
        report_written(&written);
    }
    Ok(())
}

fn executive_row(executive: &Executive) -> Vec<String> {
    vec![
        executive.name.clone(),
        executive.title.clone(),
        executive.age.map(|a| a.to_string()).unwrap_or_default(),
        executive.pay.map(|p| format!("{p:.0}")).unwrap_or_default(),
        executive.currency.clone().unwrap_or_default(),
        executive.year.map(|y| y.to_string()).unwrap_or_default(),
        executive.start_date.clone().unwrap_or_default(),
    ]
}
