use crate::display::{fmt_f64, kv_row, kv_table, listing_table, na};
use crate::models::estimates::{AnalystTarget, Estimate};
use crate::models::growth::format_growth;
use crate::models::{AnalystEstimates, AnalystRecommendations, EpsRevisions, GrowthEstimates};

fn estimate_table(title: &str, estimates: &[Estimate]) {
    if estimates.is_empty() {
        return;
    }
    println!("{title}:");
    let mut table = listing_table(&["Period", "Estimate", "Analysts", "Actual", "Surprise"]);
    for estimate in estimates {
        table.add_row(vec![
            estimate.period_label(),
            fmt_f64(estimate.estimate_value, 2),
            estimate.estimate_count.to_string(),
            fmt_f64(estimate.actual_value, 2),
            estimate
                .surprise_percent
                .map(|s| format!("{s:+.2}%"))
                .unwrap_or_else(|| "N/A".to_string()),
        ]);
    }
    println!("{table}");
}

pub fn print_estimates(estimates: &AnalystEstimates) {
    println!(
        "Analyst estimates for {}{} ({})",
        estimates.symbol,
        estimates
            .name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default(),
        estimates.currency
    );
    estimate_table("Quarterly EPS", &estimates.quarterly_eps_estimates);
    estimate_table("Annual EPS", &estimates.annual_eps_estimates);
    estimate_table("Quarterly Revenue", &estimates.quarterly_revenue_estimates);
    estimate_table("Annual Revenue", &estimates.annual_revenue_estimates);

    if !estimates.recommendation_trends.is_empty() {
        println!("Recommendation trend:");
        let mut table = listing_table(&[
            "Period", "Strong Buy", "Buy", "Hold", "Sell", "Strong Sell", "Rating",
        ]);
        for trend in &estimates.recommendation_trends {
            table.add_row(vec![
                trend.period.clone(),
                trend.strong_buy.to_string(),
                trend.buy.to_string(),
                trend.hold.to_string(),
                trend.sell.to_string(),
                trend.strong_sell.to_string(),
                trend.recommendation_label().to_string(),
            ]);
        }
        println!("{table}");
    }

    if let Some(target) = &estimates.price_target {
        print_price_target(&estimates.symbol, target);
    }
}

pub fn print_price_target(symbol: &str, target: &AnalystTarget) {
    let mut table = kv_table();
    kv_row(&mut table, "Symbol", symbol);
    kv_row(&mut table, "Mean Target", fmt_f64(target.mean_target, 2));
    kv_row(&mut table, "Median Target", fmt_f64(target.median_target, 2));
    kv_row(&mut table, "High Target", fmt_f64(target.high_target, 2));
    kv_row(&mut table, "Low Target", fmt_f64(target.low_target, 2));
    kv_row(&mut table, "Analysts", target.analyst_count.to_string());
    kv_row(&mut table, "Currency", target.currency.clone());
    println!("{table}");
}

pub fn print_recommendations(recommendations: &AnalystRecommendations) {
    let consensus = &recommendations.consensus;
    let mut summary = kv_table();
    kv_row(&mut summary, "Symbol", recommendations.symbol.clone());
    kv_row(&mut summary, "Name", na(recommendations.name.as_deref()));
    kv_row(&mut summary, "Consensus", consensus.classification.clone());
    kv_row(
        &mut summary,
        "Average Score",
        format!("{:.2} (1 = Strong Buy, 5 = Strong Sell)", consensus.average_score),
    );
    kv_row(&mut summary, "Analysts", consensus.total_analysts.to_string());
    println!("{summary}");

    let [sb, b, h, s, ss] = consensus.distribution_percentages();
    let mut distribution = listing_table(&["Rating", "Count", "Share"]);
    for (label, count, share) in [
        ("Strong Buy", consensus.strong_buy, sb),
        ("Buy", consensus.buy, b),
        ("Hold", consensus.hold, h),
        ("Sell", consensus.sell, s),
        ("Strong Sell", consensus.strong_sell, ss),
    ] {
        distribution.add_row(vec![
            label.to_string(),
            count.to_string(),
            format!("{share:.1}%"),
        ]);
    }
    println!("{distribution}");

    if !recommendations.recommendations.is_empty() {
        let mut table = listing_table(&["Date", "Firm", "Rating", "Action", "Target"]);
        for rec in &recommendations.recommendations {
            table.add_row(vec![
                na(rec.date.as_deref()),
                rec.firm.clone(),
                rec.rating.clone(),
                rec.action.clone(),
                fmt_f64(rec.target_price, 2),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_eps_revisions(revisions: &EpsRevisions) {
    println!(
        "EPS revisions for {}{}",
        revisions.symbol,
        revisions
            .name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default()
    );
    let mut table = listing_table(&[
        "Window", "Upgrades", "Downgrades", "Maintained", "Total", "Sentiment",
    ]);
    for period in [&revisions.weekly, &revisions.monthly] {
        table.add_row(vec![
            period.period_type.clone(),
            period.counts.upgrades.to_string(),
            period.counts.downgrades.to_string(),
            period.counts.maintained.to_string(),
            period.counts.total.to_string(),
            period.sentiment_label().to_string(),
        ]);
    }
    println!("{table}");

    for period in [&revisions.weekly, &revisions.monthly] {
        if period.by_period.is_empty() {
            continue;
        }
        println!("Past {} by period:", period.period_type);
        let mut breakdown = listing_table(&["Period", "Upgrades", "Downgrades", "Maintained"]);
        for (name, counts) in &period.by_period {
            breakdown.add_row(vec![
                name.clone(),
                counts.upgrades.to_string(),
                counts.downgrades.to_string(),
                counts.maintained.to_string(),
            ]);
        }
        println!("{breakdown}");
    }
}

pub fn print_growth(growth: &GrowthEstimates) {
    println!(
        "Growth estimates for {}{}",
        growth.symbol,
        growth
            .name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default()
    );
    if growth.is_empty() {
        println!("No growth estimates available.");
        return;
    }
    let mut table = listing_table(&["Period", "Growth", "Sales Growth", "EPS Growth"]);
    for (label, overall, sales, eps) in [
        (
            "Current Quarter",
            growth.current_quarter,
            growth.sales_growth_current_quarter,
            growth.eps_growth_current_quarter,
        ),
        (
            "Next Quarter",
            growth.next_quarter,
            None,
            growth.eps_growth_next_quarter,
        ),
        (
            "Current Year",
            growth.current_year,
            growth.sales_growth_current_year,
            growth.eps_growth_current_year,
        ),
        ("Next Year", growth.next_year, None, growth.eps_growth_next_year),
        ("Next 5 Years", growth.next_five_years, None, None),
        ("Past 5 Years", growth.past_five_years, None, None),
    ] {
        table.add_row(vec![
            label.to_string(),
            format_growth(overall),
            format_growth(sales),
            format_growth(eps),
        ]);
    }
    println!("{table}");
}
