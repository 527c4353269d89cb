//! Command handlers. Each handler fetches from the API, maps the payload
//! into domain records, prints, then runs any requested export.

mod analysts;
mod bonds;
mod commodities;
mod company;
mod crypto;
mod dividends;
mod etfs;
mod executives;
mod funds;
mod movers;
mod quote;
mod series;
mod splits;
mod statements;
mod symbols;

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};

use crate::api::TwelveDataClient;
use crate::cli::{Cli, Command};

pub async fn run(cli: Cli, client: &TwelveDataClient) -> Result<()> {
    match cli.command {
        Command::Quote(args) => quote::run(client, args).await,
        Command::Gainers(args) => movers::run(client, "gainers", args).await,
        Command::Losers(args) => movers::run(client, "losers", args).await,
        Command::TimeSeries(args) => series::time_series(client, args).await,
        Command::EarliestData(args) => series::earliest_data(client, args).await,
        Command::Symbols { command } => symbols::run(client, command).await,
        Command::Forex { command } => crypto::run_forex(client, command).await,
        Command::Crypto { command } => crypto::run_crypto(client, command).await,
        Command::Funds { command } => funds::run(client, command).await,
        Command::Bonds { command } => bonds::run(client, command).await,
        Command::Etfs { command } => etfs::run(client, command).await,
        Command::Commodities { command } => commodities::run(client, command).await,
        Command::Dividends { command } => dividends::run(client, command).await,
        Command::Splits { command } => splits::run(client, command).await,
        Command::Statements { command } => statements::run(client, command).await,
        Command::Analysts { command } => analysts::run(client, command).await,
        Command::MarketCap { command } => company::market_cap(client, command).await,
        Command::Profile(args) => company::profile(client, args).await,
        Command::Executives { command } => executives::run(client, command).await,
    }
}

/// Truncate a listing to `limit` rows (0 keeps everything), returning the
/// pre-truncation count for the footer line.
pub(crate) fn apply_limit<T>(mut items: Vec<T>, limit: usize) -> (Vec<T>, usize) {
    let total = items.len();
    if limit > 0 && items.len() > limit {
        items.truncate(limit);
    }
    (items, total)
}

/// Case-insensitive substring match across the given fields.
pub(crate) fn matches_search(needle: &str, fields: &[&str]) -> bool {
    let needle = needle.to_lowercase();
    fields
        .iter()
        .any(|f| f.to_lowercase().contains(&needle))
}

/// Parse a `YYYY-MM-DD` argument.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date `{raw}` (expected YYYY-MM-DD): {e}"))
}

/// Calendar date range: defaults to today through thirty days out.
pub(crate) fn calendar_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate)> {
    let today = Local::now().date_naive();
    let start = match start {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let end = match end {
        Some(raw) => parse_date(raw)?,
        None => start + Duration::days(30),
    };
    if end < start {
        anyhow::bail!("end date {end} is before start date {start}");
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_zero_keeps_everything() {
        let (items, total) = apply_limit(vec![1, 2, 3], 0);
        assert_eq!(items.len(), 3);
        assert_eq!(total, 3);
    }

    #[test]
    fn limit_truncates_and_reports_total() {
        let (items, total) = apply_limit(vec![1, 2, 3, 4], 2);
        assert_eq!(items, vec![1, 2]);
        assert_eq!(total, 4);
    }

    #[test]
    fn search_is_case_insensitive() {
        assert!(matches_search("apple", &["AAPL", "Apple Inc"]));
        assert!(!matches_search("tesla", &["AAPL", "Apple Inc"]));
    }

    #[test]
    fn calendar_range_defaults_to_thirty_days() {
        let (start, end) = calendar_range(None, None).unwrap();
        assert_eq!(end - start, Duration::days(30));
    }

    #[test]
    fn calendar_range_rejects_inverted_dates() {
        assert!(calendar_range(Some("2025-05-01"), Some("2025-04-01")).is_err());
    }
}
