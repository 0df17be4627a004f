use std::sync::Arc;

use time::Date;

use crate::domain::DatedRateSet;
use crate::http::TransportErrorKind;
use crate::provider::{ClientError, RateProvider};

/// Decorates a [`RateProvider`] so that networking faults become logged
/// `None` results instead of errors. Everything else propagates: a
/// non-network failure is a logic fault the caller must see.
pub struct ResilientRateProvider {
    inner: Arc<dyn RateProvider>,
}

impl ResilientRateProvider {
    pub fn new(inner: Arc<dyn RateProvider>) -> Self {
        Self { inner }
    }

    pub fn host(&self) -> &str {
        self.inner.host()
    }

    pub fn rates_for_date(&self, date: Date) -> Result<Option<DatedRateSet>, ClientError> {
        self.recover(self.inner.rates_for_date(date))
    }

    pub fn rates_for_range(
        &self,
        start_date: Date,
        end_date: Date,
    ) -> Result<Option<Vec<DatedRateSet>>, ClientError> {
        self.recover(self.inner.rates_for_range(start_date, end_date))
    }

    fn recover<T>(&self, result: Result<T, ClientError>) -> Result<Option<T>, ClientError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                if let ClientError::Transport(ref transport_error) = error {
                    match transport_error.kind() {
                        TransportErrorKind::Timeout => {
                            log::error!(
                                "connection to {host} timed out while collecting rates: {transport_error}",
                                host = self.inner.host(),
                            );
                            return Ok(None);
                        }
                        TransportErrorKind::Connection => {
                            log::error!(
                                "failed to connect to {host} for currency rates: {transport_error}",
                                host = self.inner.host(),
                            );
                            return Ok(None);
                        }
                        TransportErrorKind::Other => {}
                    }
                }
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::TransportError;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, Once, OnceLock};
    use time::macros::date;

    struct ScriptedProvider {
        results: Mutex<Vec<Result<DatedRateSet, ClientError>>>,
    }

    impl ScriptedProvider {
        fn new(result: Result<DatedRateSet, ClientError>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(vec![result]),
            })
        }

        fn next(&self) -> Result<DatedRateSet, ClientError> {
            self.results
                .lock()
                .expect("result store should not be poisoned")
                .pop()
                .expect("scripted provider exhausted")
        }
    }

    impl RateProvider for ScriptedProvider {
        fn rates_for_date(&self, _date: Date) -> Result<DatedRateSet, ClientError> {
            self.next()
        }

        fn rates_for_range(
            &self,
            _start_date: Date,
            _end_date: Date,
        ) -> Result<Vec<DatedRateSet>, ClientError> {
            self.next().map(|set| vec![set])
        }

        fn host(&self) -> &str {
            "rates.test"
        }
    }

    struct CapturingLogger;

    static CAPTURE: CapturingLogger = CapturingLogger;

    fn captured_records() -> &'static Mutex<Vec<(log::Level, String)>> {
        static RECORDS: OnceLock<Mutex<Vec<(log::Level, String)>>> = OnceLock::new();
        RECORDS.get_or_init(|| Mutex::new(Vec::new()))
    }

    impl log::Log for CapturingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            captured_records()
                .lock()
                .expect("capture buffer should not be poisoned")
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    fn install_capture() {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            log::set_logger(&CAPTURE).expect("capturing logger install");
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    // Tests run in parallel against one global logger, so each test
    // filters by a marker unique to its scripted fault message.
    fn error_records_containing(marker: &str) -> Vec<String> {
        captured_records()
            .lock()
            .expect("capture buffer should not be poisoned")
            .iter()
            .filter(|(level, message)| *level == log::Level::Error && message.contains(marker))
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn sample_set() -> DatedRateSet {
        DatedRateSet::new(
            date!(2024 - 03 - 01),
            BTreeMap::from([(String::from("USD"), 1.0)]),
        )
    }

    #[test]
    fn successful_fetch_passes_through() {
        let gateway = ResilientRateProvider::new(ScriptedProvider::new(Ok(sample_set())));

        let result = gateway
            .rates_for_date(date!(2024 - 03 - 01))
            .expect("gateway must not error on success");
        assert_eq!(result, Some(sample_set()));
    }

    #[test]
    fn timeout_becomes_none_instead_of_error() {
        let gateway = ResilientRateProvider::new(ScriptedProvider::new(Err(
            ClientError::Transport(TransportError::timeout("request timed out")),
        )));

        let result = gateway
            .rates_for_date(date!(2024 - 03 - 01))
            .expect("gateway must recover timeouts");
        assert_eq!(result, None);
    }

    #[test]
    fn connection_fault_becomes_none_instead_of_error() {
        let gateway = ResilientRateProvider::new(ScriptedProvider::new(Err(
            ClientError::Transport(TransportError::connection("connection refused")),
        )));

        let result = gateway
            .rates_for_range(date!(2024 - 03 - 01), date!(2024 - 03 - 05))
            .expect("gateway must recover connection faults");
        assert_eq!(result, None);
    }

    #[test]
    fn recovered_timeout_logs_one_error_naming_the_host() {
        install_capture();
        let gateway = ResilientRateProvider::new(ScriptedProvider::new(Err(
            ClientError::Transport(TransportError::timeout("deadline elapsed on read")),
        )));

        let result = gateway
            .rates_for_date(date!(2024 - 03 - 01))
            .expect("gateway must recover timeouts");
        assert_eq!(result, None);

        let records = error_records_containing("deadline elapsed on read");
        assert_eq!(records.len(), 1, "exactly one error record expected");
        assert!(records[0].contains("rates.test"));
        assert!(records[0].contains("timed out"));
    }

    #[test]
    fn recovered_connection_fault_logs_one_error_with_distinct_wording() {
        install_capture();
        let gateway = ResilientRateProvider::new(ScriptedProvider::new(Err(
            ClientError::Transport(TransportError::connection("no route to host")),
        )));

        let result = gateway
            .rates_for_range(date!(2024 - 03 - 01), date!(2024 - 03 - 05))
            .expect("gateway must recover connection faults");
        assert_eq!(result, None);

        let records = error_records_containing("no route to host");
        assert_eq!(records.len(), 1, "exactly one error record expected");
        assert!(records[0].contains("rates.test"));
        assert!(records[0].contains("failed to connect"));
        assert!(!records[0].contains("timed out"));
    }

    #[test]
    fn non_network_client_fault_propagates() {
        let gateway = ResilientRateProvider::new(ScriptedProvider::new(Err(
            ClientError::UpstreamStatus {
                host: String::from("rates.test"),
                status: 500,
            },
        )));

        let error = gateway
            .rates_for_date(date!(2024 - 03 - 01))
            .expect_err("non-network faults must propagate");
        assert!(matches!(error, ClientError::UpstreamStatus { status: 500, .. }));
    }

    #[test]
    fn other_transport_fault_propagates_without_logging() {
        install_capture();
        let gateway = ResilientRateProvider::new(ScriptedProvider::new(Err(
            ClientError::Transport(TransportError::other("stream reset mid body")),
        )));

        let error = gateway
            .rates_for_date(date!(2024 - 03 - 01))
            .expect_err("unclassified transport faults must propagate");
        assert!(matches!(
            error,
            ClientError::Transport(ref transport_error)
                if transport_error.kind() == TransportErrorKind::Other
        ));
        assert!(error_records_containing("stream reset mid body").is_empty());
    }
}
