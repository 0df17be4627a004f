pub mod migrations;

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::{params, Connection};
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    QueryFailed(#[from] ::duckdb::Error),

    #[error("rates encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub fxvault_home: PathBuf,
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let fxvault_home = resolve_fxvault_home();
        let db_path = fxvault_home.join("fxvault.duckdb");
        Self {
            fxvault_home,
            db_path,
        }
    }
}

impl StoreConfig {
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            fxvault_home: resolve_fxvault_home(),
            db_path,
        }
    }
}

/// One persisted rate set. `rates` maps currency code to the rate
/// against the base currency; it is stored as a JSON text blob.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub date: Date,
    pub rates: BTreeMap<String, f64>,
    pub source: String,
}

impl RateRecord {
    pub fn new(date: Date, rates: BTreeMap<String, f64>, source: impl Into<String>) -> Self {
        Self {
            date,
            rates,
            source: source.into(),
        }
    }
}

/// DuckDB-backed store for exchange rate records.
///
/// A connection is opened per operation and dropped on every exit path;
/// no handle is held across calls. Uniqueness of (date, source) is the
/// caller's existence-check contract, not a schema constraint.
#[derive(Debug, Clone)]
pub struct RateStore {
    config: StoreConfig,
}

impl RateStore {
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let store = Self { config };
        let connection = store.connect()?;
        migrations::apply_migrations(&connection)?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        self.config.db_path.as_path()
    }

    /// Count of stored records for the exact (date, source) pair.
    pub fn count_by_date_and_source(&self, date: Date, source: &str) -> Result<i64, StoreError> {
        let connection = self.connect()?;
        let count = connection.query_row(
            "SELECT COUNT(*) FROM exchange_rates WHERE date = CAST(? AS DATE) AND source = ?",
            params![sql_date(date), source],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert one record as a single statement inside one transaction
    /// scope, committed before returning.
    pub fn insert(&self, record: &RateRecord) -> Result<(), StoreError> {
        let rates_blob = serde_json::to_string(&record.rates)?;

        let connection = self.connect()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = connection
            .execute(
                "INSERT INTO exchange_rates (date, rates, source) VALUES (CAST(? AS DATE), ?, ?)",
                params![sql_date(record.date), rates_blob, record.source],
            )
            .map(|_| ())
            .map_err(StoreError::from);
        finalize_transaction(&connection, result)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(self.config.db_path.as_path())?)
    }
}

fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn sql_date(date: Date) -> String {
    date.format(&DATE_FORMAT)
        .expect("calendar dates are ISO formattable")
}

fn resolve_fxvault_home() -> PathBuf {
    if let Some(path) = env::var_os("FXVAULT_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".fxvault");
    }

    PathBuf::from(".fxvault")
}
