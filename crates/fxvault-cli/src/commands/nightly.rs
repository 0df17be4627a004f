use time::{Date, OffsetDateTime};

use fxvault_core::{
    format_date, parse_date, NightlyCollector, NightlyOutcome, RateStore, ResilientRateProvider,
};

use crate::cli::NightlyArgs;
use crate::error::CliError;

pub fn run(
    args: &NightlyArgs,
    store: &RateStore,
    gateway: &ResilientRateProvider,
) -> Result<(), CliError> {
    let target_date = match &args.date {
        Some(value) => parse_date(value)?,
        None => yesterday()?,
    };

    log::info!(
        "nightly rate collection starting for {date}",
        date = format_date(target_date),
    );

    let outcome = NightlyCollector::new(store, gateway).run(target_date)?;
    match outcome {
        NightlyOutcome::Inserted => {
            log::info!("nightly rate collection completed: 1 record inserted");
        }
        NightlyOutcome::AlreadyRecorded => {
            log::info!("nightly rate collection completed: date was already recorded");
        }
    }
    Ok(())
}

fn yesterday() -> Result<Date, CliError> {
    OffsetDateTime::now_utc()
        .date()
        .previous_day()
        .ok_or_else(|| CliError::Command(String::from("cannot derive a default collection date")))
}
