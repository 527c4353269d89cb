//! Terminal rendering. Listing commands get a summary table; `--detailed`
//! variants print one key/value block per record.

pub mod analysts;
pub mod company;
pub mod events;
pub mod funds;
pub mod listings;
pub mod markets;
pub mod quotes;
pub mod series;
pub mod statements;

use comfy_table::{Attribute, Cell, ContentArrangement, Table};

/// Summary table with bold column headers.
pub(crate) fn listing_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    table
}

/// Two-column key/value table for detailed views, no header row.
pub(crate) fn kv_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub(crate) fn kv_row(table: &mut Table, key: &str, value: impl Into<String>) {
    table.add_row(vec![
        Cell::new(key).add_attribute(Attribute::Bold),
        Cell::new(value.into()),
    ]);
}

pub(crate) fn na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

pub(crate) fn fmt_f64(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "N/A".to_string(),
    }
}

pub(crate) fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}

pub(crate) fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => "N/A".to_string(),
    }
}

/// Count footer printed under listing tables.
pub(crate) fn print_count(shown: usize, total: usize, what: &str) {
    if shown < total {
        println!("Showing {shown} of {total} {what}.");
    } else {
        println!("{total} {what}.");
    }
}
