use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use time::Date;

use crate::domain::{format_date, parse_date, BaseCurrency, DatedRateSet};
use crate::http::{HttpRequest, HttpTransport, TransportError, TransportErrorKind};

pub const EXCHANGE_RATE_HOST: &str = "api.exchangerate.host";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(5);

/// Errors surfaced by a rate provider client. This layer neither logs
/// nor swallows; classification happens at the gateway.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{host} returned status {status}")]
    UpstreamStatus { host: String, status: u16 },

    #[error("malformed rates response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("invalid date key '{value}' in timeseries response")]
    InvalidDateKey { value: String },
}

/// Rate provider contract: one capability set with a direct
/// implementation and a decorating one (`ResilientRateProvider`).
pub trait RateProvider: Send + Sync {
    /// Full rate set for a single date.
    fn rates_for_date(&self, date: Date) -> Result<DatedRateSet, ClientError>;

    /// One rate set per date key in the provider's timeseries response
    /// for the inclusive range. Result ordering is not part of the
    /// contract.
    fn rates_for_range(
        &self,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<DatedRateSet>, ClientError>;

    /// Target host, used by the gateway when naming failures.
    fn host(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct SingleDayResponse {
    rates: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    rates: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Direct client for `api.exchangerate.host`.
pub struct ExchangeRateHostClient {
    transport: Arc<dyn HttpTransport>,
    scheme: &'static str,
    host: String,
    base_currency: BaseCurrency,
    timeout_ms: u64,
    retry_wait: Duration,
}

impl ExchangeRateHostClient {
    pub fn new(transport: Arc<dyn HttpTransport>, base_currency: BaseCurrency) -> Self {
        Self {
            transport,
            scheme: "https",
            host: String::from(EXCHANGE_RATE_HOST),
            base_currency,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_wait: DEFAULT_RETRY_WAIT,
        }
    }

    pub fn insecure(mut self) -> Self {
        self.scheme = "http";
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry_wait(mut self, retry_wait: Duration) -> Self {
        self.retry_wait = retry_wait;
        self
    }

    /// Executes the request, retrying exactly once after a fixed wait
    /// when the transport reports a timeout. Other failure classes are
    /// surfaced immediately.
    fn execute_with_retry(
        &self,
        request: HttpRequest,
    ) -> Result<crate::http::HttpResponse, TransportError> {
        let mut retries_left = 1;
        loop {
            match self.transport.execute(request.clone()) {
                Err(error)
                    if error.kind() == TransportErrorKind::Timeout && retries_left > 0 =>
                {
                    retries_left -= 1;
                    thread::sleep(self.retry_wait);
                }
                other => return other,
            }
        }
    }

    fn fetch_body(&self, url: String) -> Result<String, ClientError> {
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self.execute_with_retry(request)?;

        if !response.is_success() {
            return Err(ClientError::UpstreamStatus {
                host: self.host.clone(),
                status: response.status,
            });
        }

        Ok(response.body)
    }
}

impl RateProvider for ExchangeRateHostClient {
    fn rates_for_date(&self, date: Date) -> Result<DatedRateSet, ClientError> {
        let url = format!(
            "{scheme}://{host}/{date}?base={base}",
            scheme = self.scheme,
            host = self.host,
            date = format_date(date),
            base = self.base_currency,
        );

        let body = self.fetch_body(url)?;
        let decoded: SingleDayResponse = serde_json::from_str(&body)?;
        Ok(DatedRateSet::new(date, decoded.rates))
    }

    fn rates_for_range(
        &self,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<DatedRateSet>, ClientError> {
        let url = format!(
            "{scheme}://{host}/timeseries?start_date={start}&end_date={end}&base={base}",
            scheme = self.scheme,
            host = self.host,
            start = format_date(start_date),
            end = format_date(end_date),
            base = self.base_currency,
        );

        let body = self.fetch_body(url)?;
        let decoded: TimeseriesResponse = serde_json::from_str(&body)?;

        let mut collection = Vec::with_capacity(decoded.rates.len());
        for (date_key, rates) in decoded.rates {
            let date = parse_date(&date_key).map_err(|_| ClientError::InvalidDateKey {
                value: date_key.clone(),
            })?;
            collection.push(DatedRateSet::new(date, rates));
        }
        Ok(collection)
    }

    fn host(&self) -> &str {
        &self.host
    }
}
