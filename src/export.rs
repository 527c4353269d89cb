//! File export for command output: pretty JSON, CSV via [`CsvRecord`] for
//! flat listings, and explicit row builders for nested statements.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::models::{
    Bond, CommodityGroup, CommodityPair, CryptoExchange, CryptoPair, Currency, Dividend, Etf,
    Exchange, ForexPair, Fund, InstrumentType, MarketCapPoint, MarketMover, Quote, Symbol,
    TimeSeries,
};

/// Output formats selectable with `--export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Both,
}

impl ExportFormat {
    fn wants_json(self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }

    fn wants_csv(self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize to JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not determine the home directory")]
    NoHomeDir,
}

/// Export flags shared by every leaf command.
#[derive(Debug, Clone, clap::Args)]
pub struct ExportArgs {
    /// Write the results to disk in the given format
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,
    /// Directory for export files (default ./exports)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Write under ~/.stock-cli/exports instead of ./exports
    #[arg(long)]
    pub use_home_dir: bool,
}

impl ExportArgs {
    pub fn format(&self) -> Option<ExportFormat> {
        self.export
    }

    /// Resolve and create the target directory.
    pub fn resolve_dir(&self) -> Result<PathBuf, ExportError> {
        let dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None if self.use_home_dir => dirs::home_dir()
                .ok_or(ExportError::NoHomeDir)?
                .join(".stock-cli")
                .join("exports"),
            None => PathBuf::from("exports"),
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// A record that knows how to lay itself out as one CSV row.
pub trait CsvRecord {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

/// `{prefix}_{symbols}_{timestamp}.{ext}`; symbols collapse to at most
/// three names, or `FIRST-and-N-more`.
pub fn export_filename(prefix: &str, symbols: &[String], extension: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let cleaned: Vec<String> = symbols
        .iter()
        .map(|s| s.replace('/', "-"))
        .collect();
    let symbol_part = match cleaned.len() {
        0 => String::new(),
        1..=3 => format!("{}_", cleaned.join("-")),
        n => format!("{}-and-{}-more_", cleaned[0], n - 1),
    };
    format!("{prefix}_{symbol_part}{timestamp}.{extension}")
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ExportError> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)?;
    info!("Wrote JSON export to {}", path.display());
    Ok(())
}

pub fn write_csv_records<T: CsvRecord>(records: &[T], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(T::headers())?;
    for record in records {
        writer.write_record(record.row())?;
    }
    writer.flush()?;
    info!("Wrote CSV export to {}", path.display());
    Ok(())
}

/// Write prebuilt rows, used by the statement exports.
pub fn write_csv_rows(
    headers: &[&str],
    rows: &[Vec<String>],
    path: &Path,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    info!("Wrote CSV export to {}", path.display());
    Ok(())
}

/// One CSV file for several series, each section introduced by a
/// `# Symbol: X` comment line.
pub fn write_time_series_csv(series: &[TimeSeries], path: &Path) -> Result<(), ExportError> {
    let mut file = fs::File::create(path)?;
    for (i, s) in series.iter().enumerate() {
        if i > 0 {
            writeln!(file)?;
        }
        writeln!(file, "# Symbol: {}", s.symbol)?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Datetime", "Open", "High", "Low", "Close", "Volume"])?;
        for bar in &s.bars {
            writer.write_record([
                bar.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.map(|v| v.to_string()).unwrap_or_default(),
            ])?;
        }
        let body = writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))?;
        file.write_all(&body)?;
    }
    info!("Wrote time series export to {}", path.display());
    Ok(())
}

/// Export a flat listing in the requested format(s), returning the paths
/// written so the caller can report them.
pub fn export_listing<T: Serialize + CsvRecord>(
    args: &ExportArgs,
    prefix: &str,
    symbols: &[String],
    records: &[T],
) -> Result<Vec<PathBuf>, ExportError> {
    let Some(format) = args.format() else {
        return Ok(Vec::new());
    };
    let dir = args.resolve_dir()?;
    let mut written = Vec::new();
    if format.wants_json() {
        let path = dir.join(export_filename(prefix, symbols, "json"));
        write_json(&records, &path)?;
        written.push(path);
    }
    if format.wants_csv() {
        let path = dir.join(export_filename(prefix, symbols, "csv"));
        write_csv_records(records, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Export a single serializable value as JSON, with prebuilt CSV rows for
/// the CSV side (statements, profiles, other nested shapes).
pub fn export_document<T: Serialize>(
    args: &ExportArgs,
    prefix: &str,
    symbols: &[String],
    value: &T,
    csv: Option<(&[&str], Vec<Vec<String>>)>,
) -> Result<Vec<PathBuf>, ExportError> {
    let Some(format) = args.format() else {
        return Ok(Vec::new());
    };
    let dir = args.resolve_dir()?;
    let mut written = Vec::new();
    if format.wants_json() {
        let path = dir.join(export_filename(prefix, symbols, "json"));
        write_json(value, &path)?;
        written.push(path);
    }
    if format.wants_csv() {
        if let Some((headers, rows)) = csv {
            let path = dir.join(export_filename(prefix, symbols, "csv"));
            write_csv_rows(headers, &rows, &path)?;
            written.push(path);
        }
    }
    Ok(written)
}

/// Export one or more time series: one JSON file and one sectioned CSV.
pub fn export_time_series(
    args: &ExportArgs,
    symbols: &[String],
    series: &[TimeSeries],
) -> Result<Vec<PathBuf>, ExportError> {
    let Some(format) = args.format() else {
        return Ok(Vec::new());
    };
    let dir = args.resolve_dir()?;
    let mut written = Vec::new();
    if format.wants_json() {
        let path = dir.join(export_filename("time_series", symbols, "json"));
        write_json(&series, &path)?;
        written.push(path);
    }
    if format.wants_csv() {
        let path = dir.join(export_filename("time_series", symbols, "csv"));
        write_time_series_csv(series, &path)?;
        written.push(path);
    }
    Ok(written)
}

/// Print where the exports landed.
pub fn report_written(paths: &[PathBuf]) {
    for path in paths {
        println!("Exported to {}", path.display());
    }
}

fn opt_str(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

fn opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvRecord for Quote {
    fn headers() -> &'static [&'static str] {
        &[
            "Symbol", "Name", "Price", "Change", "Change %", "Open", "High", "Low",
            "Previous Close", "Volume", "Currency", "Timestamp",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            opt_str(self.name.as_deref()),
            self.price.to_string(),
            self.change.to_string(),
            self.percent_change.to_string(),
            opt_f64(self.open),
            opt_f64(self.high),
            opt_f64(self.low),
            opt_f64(self.previous_close),
            self.volume.map(|v| v.to_string()).unwrap_or_default(),
            self.currency.clone(),
            self.timestamp
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        ]
    }
}

impl CsvRecord for Symbol {
    fn headers() -> &'static [&'static str] {
        &["Symbol", "Name", "Exchange", "MIC Code", "Country", "Type", "Currency"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.name.clone(),
            self.exchange.clone(),
            self.mic_code.clone(),
            self.country.clone(),
            self.instrument_type.clone(),
            self.currency.clone(),
        ]
    }
}

impl CsvRecord for Exchange {
    fn headers() -> &'static [&'static str] {
        &["Name", "Code", "Country", "Timezone"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.code.clone(),
            self.country.clone(),
            opt_str(self.timezone.as_deref()),
        ]
    }
}

impl CsvRecord for InstrumentType {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

impl CsvRecord for ForexPair {
    fn headers() -> &'static [&'static str] {
        &["Symbol", "Base", "Quote", "Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.currency_base.clone(),
            self.currency_quote.clone(),
            opt_str(self.name.as_deref()),
        ]
    }
}

impl CsvRecord for Currency {
    fn headers() -> &'static [&'static str] {
        &["Code", "Name", "Country"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            opt_str(self.country.as_deref()),
        ]
    }
}

impl CsvRecord for CryptoPair {
    fn headers() -> &'static [&'static str] {
        &["Symbol", "Base", "Quote", "Available Exchanges"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.currency_base.clone(),
            self.currency_quote.clone(),
            self.available_exchanges.join("; "),
        ]
    }
}

impl CsvRecord for CryptoExchange {
    fn headers() -> &'static [&'static str] {
        &["Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

impl CsvRecord for CommodityGroup {
    fn headers() -> &'static [&'static str] {
        &["Group", "Description", "Examples"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.examples.join("; "),
        ]
    }
}

impl CsvRecord for Fund {
    fn headers() -> &'static [&'static str] {
        &["Symbol", "Name", "Type", "Exchange", "Country", "Currency", "Fund Family"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.name.clone(),
            self.fund_type.clone(),
            self.exchange.clone(),
            self.country.clone(),
            self.currency.clone(),
            opt_str(self.fund_family.as_deref()),
        ]
    }
}

impl CsvRecord for Bond {
    fn headers() -> &'static [&'static str] {
        &[
            "Symbol", "Name", "Type", "Exchange", "Currency", "Issuer", "Coupon Rate",
            "Maturity Date", "Credit Rating", "Yield to Maturity",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.name.clone(),
            opt_str(self.bond_type.as_deref()),
            self.exchange.clone(),
            self.currency.clone(),
            opt_str(self.issuer.as_deref()),
            opt_f64(self.coupon_rate),
            opt_str(self.maturity_date.as_deref()),
            opt_str(self.credit_rating.as_deref()),
            opt_f64(self.yield_to_maturity),
        ]
    }
}

impl CsvRecord for Etf {
    fn headers() -> &'static [&'static str] {
        &[
            "Symbol", "Name", "Exchange", "Currency", "Asset Class", "Expense Ratio",
            "Managed Assets", "Dividend Yield", "Fund Family", "Description",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.name.clone(),
            self.exchange.clone(),
            self.currency.clone(),
            opt_str(self.asset_class.as_deref()),
            opt_f64(self.expense_ratio),
            opt_f64(self.managed_assets),
            opt_f64(self.dividend_yield),
            opt_str(self.fund_family.as_deref()),
            self.short_description(),
        ]
    }
}

impl CsvRecord for CommodityPair {
    fn headers() -> &'static [&'static str] {
        &["Symbol", "Base", "Quote", "Group", "Active", "Exchanges"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.base_commodity.clone(),
            self.quote_currency.clone(),
            opt_str(self.commodity_group.as_deref()),
            if self.is_active { "yes" } else { "no" }.to_string(),
            self.available_exchanges.join("; "),
        ]
    }
}

impl CsvRecord for Dividend {
    fn headers() -> &'static [&'static str] {
        &[
            "Symbol", "Ex-Dividend Date", "Payment Date", "Record Date",
            "Declaration Date", "Amount", "Currency", "Frequency",
        ]
    }

    fn row(&self) -> Vec<String> {
        let date = |d: Option<chrono::NaiveDateTime>| {
            d.map(|v| v.format("%Y-%m-%d").to_string()).unwrap_or_default()
        };
        vec![
            self.symbol.clone(),
            date(self.ex_dividend_date),
            date(self.payment_date),
            date(self.record_date),
            date(self.declaration_date),
            self.amount.to_string(),
            self.currency.clone(),
            opt_str(self.frequency.as_deref()),
        ]
    }
}

impl CsvRecord for MarketMover {
    fn headers() -> &'static [&'static str] {
        &["Symbol", "Name", "Price", "Change", "Change %", "Volume", "Exchange"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            opt_str(self.name.as_deref()),
            self.price.to_string(),
            self.change.to_string(),
            self.percent_change.to_string(),
            self.volume.map(|v| v.to_string()).unwrap_or_default(),
            opt_str(self.exchange.as_deref()),
        ]
    }
}

impl CsvRecord for MarketCapPoint {
    fn headers() -> &'static [&'static str] {
        &["Timestamp", "Market Cap", "Market Cap Value", "Shares Outstanding"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.datetime.clone(),
            self.formatted(),
            self.market_cap.to_string(),
            self.shares_outstanding.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_export_args(dir: &Path) -> ExportArgs {
        ExportArgs {
            export: Some(ExportFormat::Both),
            output_dir: Some(dir.to_path_buf()),
            use_home_dir: false,
        }
    }

    #[test]
    fn filename_collapses_symbols() {
        let one = export_filename("quotes", &["AAPL".into()], "json");
        assert!(one.starts_with("quotes_AAPL_"));
        assert!(one.ends_with(".json"));

        let three = export_filename(
            "quotes",
            &["AAPL".into(), "MSFT".into(), "GOOG".into()],
            "csv",
        );
        assert!(three.starts_with("quotes_AAPL-MSFT-GOOG_"));

        let many = export_filename(
            "quotes",
            &["AAPL".into(), "B".into(), "C".into(), "D".into(), "E".into()],
            "csv",
        );
        assert!(many.starts_with("quotes_AAPL-and-4-more_"));
    }

    #[test]
    fn filename_sanitizes_slashes() {
        let name = export_filename("forex", &["EUR/USD".into()], "json");
        assert!(name.starts_with("forex_EUR-USD_"));
    }

    #[test]
    fn filename_without_symbols_has_no_symbol_part() {
        let name = export_filename("exchanges", &[], "csv");
        assert!(name.starts_with("exchanges_2"));
    }

    #[test]
    fn exports_listing_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let quote = crate::models::Quote::from_response(&json!({
            "symbol": "AAPL",
            "close": "198.53",
            "change": "2.31"
        }))
        .unwrap();

        let written = export_listing(
            &no_export_args(dir.path()),
            "quotes",
            &["AAPL".into()],
            &[quote],
        )
        .unwrap();
        assert_eq!(written.len(), 2);

        let json_body = std::fs::read_to_string(&written[0]).unwrap();
        assert!(json_body.contains("\"symbol\": \"AAPL\""));

        let csv_body = std::fs::read_to_string(&written[1]).unwrap();
        assert!(csv_body.starts_with("Symbol,Name,Price"));
        assert!(csv_body.contains("AAPL"));
    }

    #[test]
    fn no_format_means_no_files() {
        let args = ExportArgs {
            export: None,
            output_dir: None,
            use_home_dir: false,
        };
        let written = export_listing::<crate::models::Quote>(&args, "quotes", &[], &[]).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn time_series_csv_carries_symbol_comments() {
        let dir = tempfile::tempdir().unwrap();
        let series = crate::models::TimeSeries::from_response(&json!({
            "meta": {"symbol": "AAPL", "interval": "1day"},
            "values": [
                {"datetime": "2025-04-10", "open": "1", "high": "2", "low": "0.5", "close": "1.5"}
            ]
        }))
        .unwrap();

        let path = dir.path().join("series.csv");
        write_time_series_csv(&[series.clone(), series], &path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.matches("# Symbol: AAPL").count(), 2);
        assert!(body.contains("Datetime,Open,High,Low,Close,Volume"));
    }
}
