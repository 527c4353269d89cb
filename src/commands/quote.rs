use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::TwelveDataClient;
use crate::cli::QuoteArgs;
use crate::display::quotes::{print_quote_detailed, print_quotes};
use crate::export::{export_listing, report_written};
use crate::models::QuoteBatch;
use crate::refresh::{sleep_or_interrupt, Tick};

pub async fn run(client: &TwelveDataClient, args: QuoteArgs) -> Result<()> {
    let symbols: Vec<String> = args.symbols.iter().map(|s| s.to_uppercase()).collect();

    if args.refresh {
        return refresh_loop(client, &symbols, args.detailed, args.interval).await;
    }

    let batch = fetch_and_print(client, &symbols, args.detailed).await?;
    let written = export_listing(&args.export, "quotes", &symbols, &batch.quotes)?;
    report_written(&written);
    Ok(())
}

async fn fetch_and_print(
    client: &TwelveDataClient,
    symbols: &[String],
    detailed: bool,
) -> Result<QuoteBatch> {
    let payload = client.quote(symbols).await?;
    let batch = QuoteBatch::from_response(&payload, symbols);
    for symbol in &batch.failed {
        warn!("No quote available for {}", symbol);
    }
    if batch.quotes.is_empty() {
        anyhow::bail!("no quotes returned for {}", symbols.join(", "));
    }
    if detailed {
        for quote in &batch.quotes {
            print_quote_detailed(quote);
        }
    } else {
        print_quotes(&batch.quotes);
    }
    Ok(batch)
}

/// Re-fetch and re-print until Ctrl-C. Failed fetches keep the loop alive.
async fn refresh_loop(
    client: &TwelveDataClient,
    symbols: &[String],
    detailed: bool,
    interval_secs: u64,
) -> Result<()> {
    let interval = Duration::from_secs(interval_secs.max(1));
    info!(
        "Refreshing {} every {}s, press Ctrl-C to stop",
        symbols.join(", "),
        interval.as_secs()
    );
    loop {
        if let Err(e) = fetch_and_print(client, symbols, detailed).await {
            error!("Quote refresh failed: {e:#}");
        }
        if sleep_or_interrupt(interval).await == Tick::Stop {
            println!("Stopped.");
            return Ok(());
        }
    }
}
