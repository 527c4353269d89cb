use crate::display::{fmt_f64, fmt_pct, kv_row, kv_table, listing_table, na};
use crate::models::market_cap::format_market_cap;
use crate::models::{CompanyProfile, Executive, ManagementTeam, MarketCapHistory};

pub fn print_market_cap(history: &MarketCapHistory) {
    println!(
        "Market capitalization for {} ({}, {})",
        history.symbol, history.interval, history.currency
    );
    if history.points.is_empty() {
        println!("No market cap data available.");
        return;
    }

    let mut table = listing_table(&["Date", "Market Cap", "Shares Outstanding"]);
    for point in &history.points {
        table.add_row(vec![
            point.datetime.clone(),
            point.formatted(),
            format!("{:.0}", point.shares_outstanding),
        ]);
    }
    println!("{table}");

    if let Some(summary) = &history.summary {
        let mut stats = kv_table();
        kv_row(&mut stats, "Start", format_market_cap(summary.start_cap));
        kv_row(&mut stats, "End", format_market_cap(summary.end_cap));
        kv_row(&mut stats, "Min", format_market_cap(summary.min_cap));
        kv_row(&mut stats, "Max", format_market_cap(summary.max_cap));
        kv_row(&mut stats, "Average", format_market_cap(summary.avg_cap));
        kv_row(
            &mut stats,
            "Change",
            format!(
                "{} ({:+.2}%)",
                format_market_cap(summary.change_value),
                summary.change_percent
            ),
        );
        println!("{stats}");
    }
}

/// Short-window vs long-window market cap trend for one symbol.
pub fn print_market_cap_comparison(
    symbol: &str,
    daily: &MarketCapHistory,
    monthly: &MarketCapHistory,
) {
    println!("Market cap trends for {symbol}");
    let mut table = listing_table(&["Window", "Points", "Start", "End", "Change", "Min", "Max"]);
    for (label, history) in [("Daily", daily), ("Monthly", monthly)] {
        let Some(summary) = &history.summary else {
            continue;
        };
        table.add_row(vec![
            format!("{label} ({})", history.interval),
            history.points.len().to_string(),
            format_market_cap(summary.start_cap),
            format_market_cap(summary.end_cap),
            format!(
                "{} ({:+.2}%)",
                format_market_cap(summary.change_value),
                summary.change_percent
            ),
            format_market_cap(summary.min_cap),
            format_market_cap(summary.max_cap),
        ]);
    }
    println!("{table}");
}

pub fn print_executives(team: &ManagementTeam, detailed: bool) {
    println!(
        "Executives of {}{}",
        team.symbol,
        team.name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default()
    );
    if team.executives.is_empty() {
        println!("No executive data available for {}.", team.symbol);
        return;
    }

    if detailed {
        for executive in &team.executives {
            print_executive_block(executive);
        }
        return;
    }

    let mut table = listing_table(&["Name", "Title", "Age", "Compensation"]);
    for executive in &team.executives {
        table.add_row(vec![
            executive.name.clone(),
            executive.title.clone(),
            executive
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            executive.formatted_pay(),
        ]);
    }
    println!("{table}");
}

/// Key/value block for one executive, used by the profile command and
/// the detailed listing.
pub fn print_executive_profile(executive: &Executive, company: Option<&str>) {
    if let Some(company) = company {
        println!("{company}");
    }
    print_executive_block(executive);
}

fn print_executive_block(executive: &Executive) {
    let mut table = kv_table();
    kv_row(&mut table, "Name", executive.name.clone());
    kv_row(&mut table, "Title", executive.title.clone());
    kv_row(
        &mut table,
        "Age",
        executive
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(&mut table, "Compensation", executive.formatted_pay());
    kv_row(
        &mut table,
        "Pay Year",
        executive
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(&mut table, "Start Date", na(executive.start_date.as_deref()));
    println!("{table}");
    if let Some(biography) = &executive.biography {
        println!("{biography}");
    }
}

pub fn print_compensation_analysis(team: &ManagementTeam) {
    let Some(summary) = team.compensation_summary() else {
        println!("No compensation data disclosed for {}.", team.symbol);
        return;
    };
    println!("Executive compensation for {}", team.symbol);

    let mut table = kv_table();
    kv_row(
        &mut table,
        "Executives with Disclosed Pay",
        format!("{} of {}", summary.disclosed, team.executives.len()),
    );
    kv_row(&mut table, "Total", fmt_pay(summary.total));
    kv_row(&mut table, "Average", fmt_pay(summary.average));
    kv_row(&mut table, "Median", fmt_pay(summary.median));
    kv_row(
        &mut table,
        "Highest Paid",
        format!("{} ({})", summary.highest_paid, fmt_pay(summary.highest_pay)),
    );
    println!("{table}");
}

fn fmt_pay(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else {
        crate::models::statement::format_amount(value)
    }
}

pub fn print_profile(profile: &CompanyProfile) {
    let mut table = kv_table();
    kv_row(&mut table, "Symbol", profile.symbol.clone());
    kv_row(&mut table, "Name", profile.name.clone());
    kv_row(&mut table, "Exchange", profile.exchange.clone());
    kv_row(&mut table, "Country", profile.country.clone());
    kv_row(&mut table, "Sector", na(profile.sector.as_deref()));
    kv_row(&mut table, "Industry", na(profile.industry.as_deref()));
    kv_row(&mut table, "CEO", na(profile.ceo.as_deref()));
    kv_row(
        &mut table,
        "Employees",
        profile
            .employees
            .map(|e| e.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(
        &mut table,
        "Founded",
        profile
            .founded_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(&mut table, "Headquarters", na(profile.headquarters.as_deref()));
    kv_row(&mut table, "Website", na(profile.website.as_deref()));
    kv_row(
        &mut table,
        "Market Cap",
        profile
            .market_cap
            .map(format_market_cap)
            .unwrap_or_else(|| "N/A".to_string()),
    );
    kv_row(&mut table, "P/E Ratio", fmt_f64(profile.pe_ratio, 2));
    kv_row(&mut table, "Price to Book", fmt_f64(profile.price_to_book, 2));
    kv_row(&mut table, "Dividend Yield", fmt_pct(profile.dividend_yield));
    kv_row(
        &mut table,
        "52-Week Range",
        match (profile.fifty_two_week_low, profile.fifty_two_week_high) {
            (Some(low), Some(high)) => format!("{low:.2} - {high:.2}"),
            _ => "N/A".to_string(),
        },
    );
    println!("{table}");

    if let Some(description) = profile.short_description() {
        println!("{description}");
    }
}
