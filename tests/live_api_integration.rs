use std::time::Duration;

use stock_cli::api::TwelveDataClient;
use stock_cli::config::{Settings, DEFAULT_BASE_URL};
use stock_cli::models::{QuoteBatch, TimeSeries};

fn live_client() -> Option<TwelveDataClient> {
    let api_key = std::env::var("TWELVEDATA_API_KEY").ok()?;
    let settings = Settings {
        api_key,
        base_url: DEFAULT_BASE_URL.to_string(),
        timeout: Duration::from_secs(30),
    };
    TwelveDataClient::new(&settings).ok()
}

/// Integration test that hits the live Twelve Data API.
///
/// Requires outbound network access and `TWELVEDATA_API_KEY` in the
/// environment. Ignored by default so offline and CI runs stay green; run
/// manually with `cargo test -- --ignored fetches_live_quote`.
#[tokio::test]
#[ignore = "requires network access to Twelve Data"]
async fn fetches_live_quote() -> Result<(), Box<dyn std::error::Error>> {
    let client = live_client().expect("TWELVEDATA_API_KEY must be set for live tests");

    let symbols = vec!["AAPL".to_string()];
    let payload = client.quote(&symbols).await?;
    let batch = QuoteBatch::from_response(&payload, &symbols);

    println!(
        "fetched {} quote(s), {} failed",
        batch.quotes.len(),
        batch.failed.len()
    );
    assert_eq!(batch.quotes.len(), 1);
    assert_eq!(batch.quotes[0].symbol, "AAPL");
    assert!(batch.quotes[0].price > 0.0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires network access to Twelve Data"]
async fn fetches_live_time_series() -> Result<(), Box<dyn std::error::Error>> {
    let client = live_client().expect("TWELVEDATA_API_KEY must be set for live tests");

    let payload = client
        .time_series("AAPL", "1day", 10, None, None)
        .await?;
    let series = TimeSeries::from_response(&payload)?;

    println!(
        "fetched {} bars for {} at {}",
        series.bars.len(),
        series.symbol,
        series.interval
    );
    assert_eq!(series.symbol, "AAPL");
    assert!(!series.bars.is_empty());
    Ok(())
}
