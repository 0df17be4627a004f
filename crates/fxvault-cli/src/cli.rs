//! CLI argument definitions for fxvault.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `nightly` | Collect and store rates for a single date |
//! | `historical` | Backfill rates for a date window |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--base` | `USD` | Base currency for fetched rates |
//! | `--db-path` | `$FXVAULT_HOME/fxvault.duckdb` | DuckDB database file |
//! | `--timeout-ms` | `10000` | Request timeout in ms |
//! | `--retry-wait-ms` | `5000` | Wait before the single timeout retry |
//!
//! # Examples
//!
//! ```bash
//! # Collect yesterday's rates
//! fxvault nightly
//!
//! # Collect a specific date against GBP
//! fxvault nightly --date 2024-03-01 --base GBP
//!
//! # Backfill the 30 days leading up to a date
//! fxvault historical --end-date 2024-03-31 --previous-days 30
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use fxvault_core::BaseCurrency;

/// Daily currency exchange-rate collector backed by a local DuckDB store.
#[derive(Debug, Parser)]
#[command(name = "fxvault", author, version, about = "Currency exchange-rate collector")]
pub struct Cli {
    /// Base currency the fetched rates are quoted against.
    #[arg(long, global = true, default_value = "USD")]
    pub base: BaseCurrency,

    /// Path to the DuckDB database file.
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Wait in milliseconds before the single retry after a timeout.
    #[arg(long, global = true, default_value_t = 5_000)]
    pub retry_wait_ms: u64,

    /// Talk to the provider over plain HTTP. Test environments only.
    #[arg(long, global = true, default_value_t = false, hide = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect and store rates for one date (defaults to yesterday, UTC).
    Nightly(NightlyArgs),
    /// Backfill rates for the window ending at a given date.
    Historical(HistoricalArgs),
}

#[derive(Debug, Args)]
pub struct NightlyArgs {
    /// Date to collect, as YYYY-MM-DD. Defaults to yesterday (UTC).
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct HistoricalArgs {
    /// Last date of the window, as YYYY-MM-DD.
    #[arg(long)]
    pub end_date: String,

    /// Number of days before the end date to include.
    #[arg(long)]
    pub previous_days: u32,
}
