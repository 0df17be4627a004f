use fxvault_core::{format_date, parse_date, HistoricalLoader, RateStore, ResilientRateProvider};

use crate::cli::HistoricalArgs;
use crate::error::CliError;

pub fn run(
    args: &HistoricalArgs,
    store: &RateStore,
    gateway: &ResilientRateProvider,
) -> Result<(), CliError> {
    let end_date = parse_date(&args.end_date)?;

    log::info!(
        "historical rate load starting: {days} days up to {end}",
        days = args.previous_days,
        end = format_date(end_date),
    );

    let report = HistoricalLoader::new(store, gateway).run(end_date, args.previous_days)?;

    log::info!(
        "historical rate load completed: {inserted} inserted, {skipped} skipped as duplicates",
        inserted = report.inserted,
        skipped = report.skipped,
    );
    Ok(())
}
