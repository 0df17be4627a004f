// Shared test doubles for ingestion behavior tests
pub use fxvault_core::{
    BaseCurrency, ExchangeRateHostClient, HistoricalLoader, HttpRequest, HttpResponse,
    HttpTransport, NightlyCollector, NightlyOutcome, RateStore, ResilientRateProvider,
    StoreConfig, TransportError, SOURCE_LABEL,
};
pub use std::sync::Arc;

use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport double that replays canned responses in order and records
/// every requested URL.
pub struct CannedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    urls: Mutex<Vec<String>>,
}

impl CannedTransport {
    pub fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls
            .lock()
            .expect("url log should not be poisoned")
            .clone()
    }
}

impl HttpTransport for CannedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.urls
            .lock()
            .expect("url log should not be poisoned")
            .push(request.url);
        self.responses
            .lock()
            .expect("response script should not be poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::other("canned transport exhausted")))
    }
}
