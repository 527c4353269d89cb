use crate::display::{kv_row, kv_table, listing_table, na, print_count, yes_no};
use crate::models::{Exchange, ExchangeSchedule, InstrumentType, Symbol};

pub fn print_symbols(symbols: &[Symbol], total: usize) {
    let mut table = listing_table(&[
        "Symbol", "Name", "Exchange", "MIC", "Country", "Type", "Currency",
    ]);
    for s in symbols {
        table.add_row(vec![
            s.symbol.clone(),
            s.name.clone(),
            s.exchange.clone(),
            s.mic_code.clone(),
            s.country.clone(),
            s.instrument_type.clone(),
            s.currency.clone(),
        ]);
    }
    println!("{table}");
    print_count(symbols.len(), total, "symbols");
}

pub fn print_search_results(symbols: &[Symbol], query: &str) {
    if symbols.is_empty() {
        println!("No symbols matched \"{query}\".");
        return;
    }
    println!("Search results for \"{query}\":");
    print_symbols(symbols, symbols.len());
}

pub fn print_cross_listings(symbols: &[Symbol], symbol: &str) {
    if symbols.is_empty() {
        println!("No cross listings found for {symbol}.");
        return;
    }
    let mut table = listing_table(&["Symbol", "Name", "Exchange", "MIC", "Country", "Currency"]);
    for s in symbols {
        table.add_row(vec![
            s.symbol.clone(),
            s.name.clone(),
            s.exchange.clone(),
            s.mic_code.clone(),
            s.country.clone(),
            s.currency.clone(),
        ]);
    }
    println!("{table}");
    print_count(symbols.len(), symbols.len(), "listings");
}

pub fn print_exchanges(exchanges: &[Exchange], total: usize) {
    let mut table = listing_table(&["Code", "Name", "Country", "Timezone"]);
    for e in exchanges {
        table.add_row(vec![
            e.code.clone(),
            e.name.clone(),
            e.country.clone(),
            na(e.timezone.as_deref()),
        ]);
    }
    println!("{table}");
    print_count(exchanges.len(), total, "exchanges");
}

pub fn print_exchange_details(schedule: &ExchangeSchedule) {
    let mut table = kv_table();
    kv_row(&mut table, "Code", schedule.code.clone());
    kv_row(&mut table, "Name", schedule.name.clone());
    kv_row(&mut table, "Country", schedule.country.clone());
    kv_row(&mut table, "Timezone", na(schedule.timezone.as_deref()));
    kv_row(&mut table, "MIC Code", na(schedule.mic_code.as_deref()));
    kv_row(&mut table, "Operating MIC", na(schedule.operating_mic.as_deref()));
    kv_row(&mut table, "Currency", na(schedule.currency.as_deref()));
    kv_row(&mut table, "Suffix", na(schedule.suffix.as_deref()));
    kv_row(&mut table, "Open Now", yes_no(schedule.is_open));
    kv_row(&mut table, "Website", na(schedule.website.as_deref()));
    println!("{table}");

    if !schedule.holidays.is_empty() {
        println!("Holidays: {}", schedule.holidays.join(", "));
    }
}

pub fn print_trading_hours(schedule: &ExchangeSchedule) {
    println!(
        "Trading hours for {} ({})",
        schedule.name, schedule.code
    );
    if schedule.sessions.is_empty() {
        println!("No session data available.");
        return;
    }
    let mut table = listing_table(&["Session", "Open", "Close"]);
    for session in &schedule.sessions {
        table.add_row(vec![
            session.session.clone(),
            session.open.clone(),
            session.close.clone(),
        ]);
    }
    println!("{table}");
}

pub fn print_instrument_types(types: &[InstrumentType]) {
    let mut table = listing_table(&["ID", "Name"]);
    for t in types {
        table.add_row(vec![t.id.clone(), t.name.clone()]);
    }
    println!("{table}");
    print_count(types.len(), types.len(), "instrument types");
}
