use async_trait::async_trait;
use launchpad_core::report::CreateSchemeReport;
use launchpad_core::scheme::{Criterion, Document, Scheme};
use launchpad_core::SchemeDetails;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Abstraction over the schemes backend.
///
/// The TUI programs against this trait through `BlockingHttpService`;
/// the proxy uses `HttpService` directly.
#[async_trait]
pub trait SchemeService: Send + Sync {
    // -- Schemes --
    async fn list_schemes(&self) -> Result<Vec<Scheme>, ServiceError>;
    async fn list_criteria(&self, scheme_id: i64) -> Result<Vec<Criterion>, ServiceError>;
    async fn list_documents(&self, scheme_id: i64) -> Result<Vec<Document>, ServiceError>;

    /// Fetch criteria and documents concurrently. Both must succeed.
    async fn scheme_details(&self, scheme_id: i64) -> Result<SchemeDetails, ServiceError> {
        let (criteria, documents) = tokio::join!(
            self.list_criteria(scheme_id),
            self.list_documents(scheme_id)
        );
        Ok(SchemeDetails {
            criteria: criteria?,
            documents: documents?,
        })
    }

    // -- Authenticated actions --
    async fn submit_report(
        &self,
        report: &CreateSchemeReport,
        token: &str,
    ) -> Result<(), ServiceError>;
    async fn save_scheme(&self, scheme_id: i64, token: &str) -> Result<(), ServiceError>;
}
