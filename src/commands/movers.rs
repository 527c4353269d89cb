use anyhow::Result;

use crate::api::TwelveDataClient;
use crate::cli::MoversArgs;
use crate::commands::apply_limit;
use crate::display::quotes::print_market_movers;
use crate::export::{export_listing, report_written};
use crate::models::MarketMover;

/// Shared handler for `gainers` and `losers`; `direction` is the vendor
/// parameter and doubles as the export prefix.
pub async fn run(client: &TwelveDataClient, direction: &str, args: MoversArgs) -> Result<()> {
    let outputsize = if args.limit == 0 { 50 } else { args.limit as u32 };
    let payload = client.market_movers(direction, outputsize).await?;
    let mut movers = MarketMover::list_from_response(&payload);

    if let Some(exchange) = &args.exchange {
        movers.retain(|m| {
            m.exchange
                .as_deref()
                .map_or(false, |e| e.eq_ignore_ascii_case(exchange))
        });
    }
    let (movers, _) = apply_limit(movers, args.limit);
    if movers.is_empty() {
        anyhow::bail!("no {direction} data returned");
    }
    print_market_movers(&movers, direction);

    let written = export_listing(&args.export, direction, &[], &movers)?;
    report_written(&written);
    Ok(())
}
