use thiserror::Error;
use time::{Date, Duration};

use fxvault_store::{RateRecord, StoreError};

use crate::domain::{format_date, DatedRateSet};
use crate::gateway::ResilientRateProvider;
use crate::provider::ClientError;
use crate::store::RateRecordStore;

/// Source label stamped on every record written by these jobs; part of
/// the (date, source) uniqueness key. One named constant so the nightly
/// and historical paths cannot drift.
pub const SOURCE_LABEL: &str = "EXCHANGE_RATE_HOST";

#[derive(Debug, Error)]
pub enum IngestError {
    /// The gateway recovered a networking fault into an empty result
    /// where a result was required.
    #[error("failed to collect rates from client '{client}.{operation}'")]
    Collection {
        client: String,
        operation: &'static str,
    },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot derive a start date from {end_date} minus {previous_days} days")]
    InvalidWindow { end_date: Date, previous_days: u32 },
}

/// Result of a nightly run. A pre-existing record is success: nightly
/// jobs must be idempotent under at-least-once scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightlyOutcome {
    Inserted,
    AlreadyRecorded,
}

/// Single-date collection job: duplicate check, fetch, validate,
/// persist.
pub struct NightlyCollector<'a> {
    store: &'a dyn RateRecordStore,
    provider: &'a ResilientRateProvider,
    source: &'a str,
}

impl<'a> NightlyCollector<'a> {
    pub fn new(store: &'a dyn RateRecordStore, provider: &'a ResilientRateProvider) -> Self {
        Self {
            store,
            provider,
            source: SOURCE_LABEL,
        }
    }

    pub fn run(&self, target_date: Date) -> Result<NightlyOutcome, IngestError> {
        if self.store.count_by_date_and_source(target_date, self.source)? > 0 {
            log::warn!(
                "rates for {date} from source '{source}' already recorded; nothing to do",
                date = format_date(target_date),
                source = self.source,
            );
            return Ok(NightlyOutcome::AlreadyRecorded);
        }

        let rate_set = self
            .provider
            .rates_for_date(target_date)?
            .ok_or_else(|| IngestError::Collection {
                client: self.provider.host().to_owned(),
                operation: "rates_for_date",
            })?;

        self.store.insert(&to_record(rate_set, self.source))?;
        Ok(NightlyOutcome::Inserted)
    }
}

/// Per-run counts reported by the historical loader.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Ranged backfill job. Duplicates are routine and skipped per record;
/// a genuine write failure aborts the whole run because it would repeat
/// for every remaining record.
pub struct HistoricalLoader<'a> {
    store: &'a dyn RateRecordStore,
    provider: &'a ResilientRateProvider,
    source: &'a str,
}

impl<'a> HistoricalLoader<'a> {
    pub fn new(store: &'a dyn RateRecordStore, provider: &'a ResilientRateProvider) -> Self {
        Self {
            store,
            provider,
            source: SOURCE_LABEL,
        }
    }

    pub fn run(&self, end_date: Date, previous_days: u32) -> Result<HistoricalReport, IngestError> {
        let start_date = end_date
            .checked_sub(Duration::days(i64::from(previous_days)))
            .ok_or(IngestError::InvalidWindow {
                end_date,
                previous_days,
            })?;

        let rate_sets = self
            .provider
            .rates_for_range(start_date, end_date)?
            .ok_or_else(|| IngestError::Collection {
                client: self.provider.host().to_owned(),
                operation: "rates_for_range",
            })?;

        let mut report = HistoricalReport::default();
        for rate_set in rate_sets {
            let record = to_record(rate_set, self.source);

            if self
                .store
                .count_by_date_and_source(record.date, &record.source)?
                > 0
            {
                log::warn!(
                    "duplicate record for {date} from source '{source}'; skipping",
                    date = format_date(record.date),
                    source = record.source,
                );
                report.skipped += 1;
                continue;
            }

            if let Err(error) = self.store.insert(&record) {
                log::error!(
                    "failed to save rates dated {date}: {error}",
                    date = format_date(record.date),
                );
                return Err(error.into());
            }
            report.inserted += 1;
        }

        Ok(report)
    }
}

fn to_record(rate_set: DatedRateSet, source: &str) -> RateRecord {
    RateRecord::new(rate_set.date, rate_set.rates, source)
}
