//! Core contracts for fxvault.
//!
//! This crate contains:
//! - Domain models and date/currency validation
//! - The blocking HTTP transport seam
//! - The exchangerate.host provider client and its resilient gateway
//! - The nightly and historical ingestion jobs

pub mod domain;
pub mod error;
pub mod gateway;
pub mod http;
pub mod ingest;
pub mod provider;
pub mod store;

pub use domain::{format_date, parse_date, BaseCurrency, DatedRateSet};
pub use error::ValidationError;
pub use fxvault_store::{RateRecord, RateStore, StoreConfig, StoreError};
pub use gateway::ResilientRateProvider;
pub use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use ingest::{
    HistoricalLoader, HistoricalReport, IngestError, NightlyCollector, NightlyOutcome,
    SOURCE_LABEL,
};
pub use provider::{ClientError, ExchangeRateHostClient, RateProvider, EXCHANGE_RATE_HOST};
pub use store::RateRecordStore;
