use serde_json::json;
use tempfile::tempdir;

use stock_cli::export::{
    export_document, export_listing, export_time_series, ExportArgs, ExportFormat,
};
use stock_cli::models::{Symbol, TimeSeries};

fn args_for(dir: &std::path::Path, format: ExportFormat) -> ExportArgs {
    ExportArgs {
        export: Some(format),
        output_dir: Some(dir.to_path_buf()),
        use_home_dir: false,
    }
}

fn sample_symbols() -> Vec<Symbol> {
    Symbol::list_from_response(&json!({"data": [
        {"symbol": "AAPL", "name": "Apple Inc", "currency": "USD",
         "exchange": "NASDAQ", "mic_code": "XNGS", "country": "United States",
         "type": "Common Stock"},
        {"symbol": "MSFT", "name": "Microsoft Corporation", "currency": "USD",
         "exchange": "NASDAQ", "mic_code": "XNGS", "country": "United States",
         "type": "Common Stock"}
    ]}))
}

#[test]
fn listing_export_writes_both_formats() {
    let dir = tempdir().unwrap();
    let written = export_listing(
        &args_for(dir.path(), ExportFormat::Both),
        "symbols",
        &[],
        &sample_symbols(),
    )
    .unwrap();

    assert_eq!(written.len(), 2);
    let json_body = std::fs::read_to_string(&written[0]).unwrap();
    assert!(json_body.contains("\"symbol\": \"AAPL\""));

    let csv_body = std::fs::read_to_string(&written[1]).unwrap();
    let mut lines = csv_body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Symbol,Name,Exchange,MIC Code,Country,Type,Currency"
    );
    assert_eq!(csv_body.lines().count(), 3);
}

#[test]
fn csv_only_export_writes_one_file() {
    let dir = tempdir().unwrap();
    let written = export_listing(
        &args_for(dir.path(), ExportFormat::Csv),
        "symbols",
        &[],
        &sample_symbols(),
    )
    .unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].extension().unwrap(), "csv");
}

#[test]
fn document_export_uses_provided_rows() {
    let dir = tempdir().unwrap();
    let value = json!({"symbol": "AAPL", "note": "nested document"});
    let rows = vec![
        vec!["Revenue".to_string(), "391.0B".to_string(), "100.00%".to_string()],
        vec!["Net Income".to_string(), "93.7B".to_string(), "23.97%".to_string()],
    ];
    let written = export_document(
        &args_for(dir.path(), ExportFormat::Both),
        "income_statement",
        &["AAPL".to_string()],
        &value,
        Some((&["Line Item", "Amount", "% of Revenue"], rows)),
    )
    .unwrap();

    assert_eq!(written.len(), 2);
    let csv_body = std::fs::read_to_string(&written[1]).unwrap();
    assert!(csv_body.starts_with("Line Item,Amount,% of Revenue"));
    assert!(csv_body.contains("Net Income"));

    let name = written[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("income_statement_AAPL_"));
    assert!(name.ends_with(".json"));
}

#[test]
fn time_series_export_sections_by_symbol() {
    let dir = tempdir().unwrap();
    let aapl = TimeSeries::from_response(&json!({
        "meta": {"symbol": "AAPL", "interval": "1day"},
        "values": [{"datetime": "2025-04-10", "open": "1", "high": "2", "low": "0.5", "close": "1.5"}]
    }))
    .unwrap();
    let msft = TimeSeries::from_response(&json!({
        "meta": {"symbol": "MSFT", "interval": "1day"},
        "values": [{"datetime": "2025-04-10", "open": "3", "high": "4", "low": "2.5", "close": "3.5"}]
    }))
    .unwrap();

    let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
    let written = export_time_series(
        &args_for(dir.path(), ExportFormat::Csv),
        &symbols,
        &[aapl, msft],
    )
    .unwrap();

    assert_eq!(written.len(), 1);
    let name = written[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("time_series_AAPL-MSFT_"));

    let body = std::fs::read_to_string(&written[0]).unwrap();
    assert!(body.contains("# Symbol: AAPL"));
    assert!(body.contains("# Symbol: MSFT"));
    assert_eq!(body.matches("Datetime,Open,High,Low,Close,Volume").count(), 2);
}

#[test]
fn resolve_dir_creates_missing_directories() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let args = ExportArgs {
        export: Some(ExportFormat::Json),
        output_dir: Some(nested.clone()),
        use_home_dir: false,
    };
    let resolved = args.resolve_dir().unwrap();
    assert_eq!(resolved, nested);
    assert!(nested.is_dir());
}
