use anyhow::Result;

use crate::api::TwelveDataClient;
use crate::cli::{EarliestDataArgs, SortOrder, TimeSeriesArgs};
use crate::display::series::{print_earliest, print_time_series};
use crate::export::{export_document, export_time_series, report_written};
use crate::models::{EarliestTimestamp, TimeSeries};

pub async fn time_series(client: &TwelveDataClient, args: TimeSeriesArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client
        .time_series(
            &symbol,
            &args.interval,
            args.outputsize,
            args.start.as_deref(),
            args.end.as_deref(),
        )
        .await?;
    let mut series = TimeSeries::from_response(&payload)?;
    series.sort(args.order == SortOrder::Asc);
    series.truncate(args.limit);
    print_time_series(&series);

    let written = export_time_series(
        &args.export,
        std::slice::from_ref(&symbol),
        std::slice::from_ref(&series),
    )?;
    report_written(&written);
    Ok(())
}

pub async fn earliest_data(client: &TwelveDataClient, args: EarliestDataArgs) -> Result<()> {
    let symbol = args.symbol.to_uppercase();
    let payload = client.earliest_timestamp(&symbol, &args.interval).await?;
    let earliest = EarliestTimestamp::from_response(&payload)?;
    print_earliest(&symbol, &args.interval, &earliest);

    let written = export_document(
        &args.export,
        "earliest_data",
        std::slice::from_ref(&symbol),
        &earliest,
        None,
    )?;
    report_written(&written);
    Ok(())
}
