use time::Date;

use fxvault_store::{RateRecord, RateStore, StoreError};

/// Persistence contract used by the orchestrators: existence check by
/// (date, source) and insert-if-absent. Implemented by the DuckDB
/// store and by in-memory doubles in tests.
pub trait RateRecordStore {
    fn count_by_date_and_source(&self, date: Date, source: &str) -> Result<i64, StoreError>;

    fn insert(&self, record: &RateRecord) -> Result<(), StoreError>;
}

impl RateRecordStore for RateStore {
    fn count_by_date_and_source(&self, date: Date, source: &str) -> Result<i64, StoreError> {
        RateStore::count_by_date_and_source(self, date, source)
    }

    fn insert(&self, record: &RateRecord) -> Result<(), StoreError> {
        RateStore::insert(self, record)
    }
}
