use crate::display::{kv_row, kv_table, listing_table, na, print_count};
use crate::models::{
    CommodityGroup, CommodityPair, CryptoExchange, CryptoPair, Currency, ExchangeRate, ForexPair,
};

pub fn print_forex_pairs(pairs: &[ForexPair], total: usize) {
    let mut table = listing_table(&["Symbol", "Base", "Quote", "Name"]);
    for pair in pairs {
        table.add_row(vec![
            pair.symbol.clone(),
            pair.currency_base.clone(),
            pair.currency_quote.clone(),
            na(pair.name.as_deref()),
        ]);
    }
    println!("{table}");
    print_count(pairs.len(), total, "forex pairs");
}

pub fn print_currencies(currencies: &[Currency], total: usize) {
    let mut table = listing_table(&["Code", "Name", "Country"]);
    for currency in currencies {
        table.add_row(vec![
            currency.code.clone(),
            currency.name.clone(),
            na(currency.country.as_deref()),
        ]);
    }
    println!("{table}");
    print_count(currencies.len(), total, "currencies");
}

pub fn print_exchange_rate(rate: &ExchangeRate) {
    let mut table = kv_table();
    kv_row(&mut table, "Pair", rate.symbol.clone());
    kv_row(&mut table, "Rate", format!("{:.6}", rate.rate));
    kv_row(
        &mut table,
        "As Of",
        rate.timestamp
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    println!("{table}");
}

pub fn print_crypto_pairs(pairs: &[CryptoPair], total: usize) {
    let mut table = listing_table(&["Symbol", "Base", "Quote", "Exchanges"]);
    for pair in pairs {
        let exchanges = if pair.available_exchanges.len() > 4 {
            format!(
                "{} and {} more",
                pair.available_exchanges[..4].join(", "),
                pair.available_exchanges.len() - 4
            )
        } else {
            pair.available_exchanges.join(", ")
        };
        table.add_row(vec![
            pair.symbol.clone(),
            pair.currency_base.clone(),
            pair.currency_quote.clone(),
            exchanges,
        ]);
    }
    println!("{table}");
    print_count(pairs.len(), total, "crypto pairs");
}

pub fn print_crypto_exchanges(exchanges: &[CryptoExchange]) {
    let mut table = listing_table(&["Exchange"]);
    for exchange in exchanges {
        table.add_row(vec![exchange.name.clone()]);
    }
    println!("{table}");
    print_count(exchanges.len(), exchanges.len(), "crypto exchanges");
}

pub fn print_commodity_pairs(pairs: &[CommodityPair], total: usize) {
    let mut table = listing_table(&["Symbol", "Base", "Quote", "Group", "Active"]);
    for pair in pairs {
        table.add_row(vec![
            pair.symbol.clone(),
            pair.base_commodity.clone(),
            pair.quote_currency.clone(),
            na(pair.commodity_group.as_deref()),
            if pair.is_active { "Yes" } else { "No" }.to_string(),
        ]);
    }
    println!("{table}");
    print_count(pairs.len(), total, "commodity pairs");
}

pub fn print_commodity_pairs_detailed(pairs: &[CommodityPair]) {
    for pair in pairs {
        let mut table = kv_table();
        kv_row(&mut table, "Symbol", pair.symbol.clone());
        kv_row(&mut table, "Base Commodity", pair.base_commodity.clone());
        kv_row(&mut table, "Quote Currency", pair.quote_currency.clone());
        kv_row(&mut table, "Group", na(pair.commodity_group.as_deref()));
        kv_row(
            &mut table,
            "Active",
            if pair.is_active { "Yes" } else { "No" },
        );
        if let Some(description) = &pair.symbol_description {
            kv_row(&mut table, "Description", description.clone());
        }
        if !pair.available_exchanges.is_empty() {
            kv_row(&mut table, "Exchanges", pair.available_exchanges.join(", "));
        }
        println!("{table}");
    }
}

pub fn print_commodity_groups(groups: &[CommodityGroup]) {
    let mut table = listing_table(&["Group", "Description", "Examples"]);
    for group in groups {
        table.add_row(vec![
            group.name.clone(),
            group.description.clone(),
            group.examples.join(", "),
        ]);
    }
    println!("{table}");
}
