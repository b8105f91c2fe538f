use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use launchpad_core::report::CreateSchemeReport;
use launchpad_core::scheme::Scheme;
use launchpad_core::SchemeDetails;
use tokio::runtime::Runtime;

use crate::{HttpService, SchemeService, ServiceError};

/// Blocking wrapper around the async `HttpService`.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the TUI. Detail fetches can also be
/// pushed onto the runtime with [`spawn_scheme_details`](Self::spawn_scheme_details)
/// so the caller's loop keeps running while they are in flight.
pub struct BlockingHttpService {
    inner: Arc<HttpService>,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let rt = Runtime::new()
            .map_err(|e| ServiceError::Internal(format!("failed to create tokio runtime: {e}")))?;
        Ok(Self {
            inner: Arc::new(HttpService::new(base_url)),
            rt,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn list_schemes(&self) -> Result<Vec<Scheme>, ServiceError> {
        self.rt.block_on(self.inner.list_schemes())
    }

    /// Start fetching details in the background.
    ///
    /// The result arrives on the returned channel. Dropping the receiver
    /// abandons the result; the requests themselves run to completion.
    pub fn spawn_scheme_details(
        &self,
        scheme_id: i64,
    ) -> Receiver<Result<SchemeDetails, ServiceError>> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        self.rt.spawn(async move {
            let result = inner.scheme_details(scheme_id).await;
            if tx.send(result).is_err() {
                tracing::debug!(scheme_id, "details receiver dropped, discarding result");
            }
        });
        rx
    }

    pub fn submit_report(
        &self,
        report: &CreateSchemeReport,
        token: &str,
    ) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.submit_report(report, token))
    }

    pub fn save_scheme(&self, scheme_id: i64, token: &str) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.save_scheme(scheme_id, token))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use launchpad_core::report::ReportCategory;
    use launchpad_server::test_helpers::{spawn_mock_backend, MockBackend, RequestLog};
    use serde_json::json;

    /// Spawn the mock backend on a background thread (since BlockingHttpService
    /// creates its own tokio runtime and cannot be nested inside another).
    /// The server stays alive via `std::future::pending()`.
    fn spawn_blocking_backend(backend: MockBackend) -> (String, RequestLog) {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let server = spawn_mock_backend(backend).await;
                tx.send((server.base_url.clone(), server.requests.clone()))
                    .unwrap();
                std::future::pending::<()>().await;
            });
        });
        rx.recv().unwrap()
    }

    #[test]
    fn blocking_list_schemes() {
        let (url, _) = spawn_blocking_backend(MockBackend::default());
        let svc = BlockingHttpService::new(&url).unwrap();
        let schemes = svc.list_schemes().unwrap();
        assert!(!schemes.is_empty());
        assert!(schemes[0].id.is_some());
    }

    #[test]
    fn spawned_details_arrive_on_channel() {
        let (url, log) = spawn_blocking_backend(MockBackend::default());
        let svc = BlockingHttpService::new(&url).unwrap();
        let rx = svc.spawn_scheme_details(1);
        let details = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert!(!details.criteria.is_empty());
        assert!(!details.documents.is_empty());
        assert_eq!(log.count_path("/api/schemes/1/criteria/"), 1);
        assert_eq!(log.count_path("/api/schemes/1/documents/"), 1);
    }

    #[test]
    fn spawned_details_report_failure() {
        let backend = MockBackend {
            documents_status: 503,
            ..MockBackend::default()
        };
        let (url, _) = spawn_blocking_backend(backend);
        let svc = BlockingHttpService::new(&url).unwrap();
        let rx = svc.spawn_scheme_details(1);
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    #[test]
    fn blocking_submit_report_carries_token() {
        let (url, log) = spawn_blocking_backend(MockBackend::default());
        let svc = BlockingHttpService::new(&url).unwrap();
        let report = CreateSchemeReport {
            scheme_id: 1,
            description: "test".into(),
            report_category: ReportCategory::IncorrectInfo,
        };
        svc.submit_report(&report, "tok").unwrap();

        let sent = log.last_for("/api/feedback/scheme-reports/").unwrap();
        assert_eq!(sent.method, "POST");
        assert_eq!(sent.authorization.as_deref(), Some("Bearer tok"));
        assert_eq!(
            sent.body,
            Some(json!({
                "scheme_id": 1,
                "description": "test",
                "report_category": "incorrect_info"
            }))
        );
    }

    #[test]
    fn blocking_save_scheme_unauthorized() {
        let backend = MockBackend {
            save_status: 401,
            ..MockBackend::default()
        };
        let (url, _) = spawn_blocking_backend(backend);
        let svc = BlockingHttpService::new(&url).unwrap();
        let err = svc.save_scheme(1, "expired").unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
