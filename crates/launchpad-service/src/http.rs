use std::time::Duration;

use async_trait::async_trait;
use launchpad_core::report::CreateSchemeReport;
use launchpad_core::scheme::{Criterion, Document, Scheme};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::{SchemeService, ServiceError};

/// Async HTTP client for the schemes backend.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Client whose requests fail once `timeout` elapses.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("build client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_bearer(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {token}"))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        handle_response(resp).await
    }

    async fn post_authed<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<(), ServiceError> {
        let builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        let resp = Self::with_bearer(builder, token)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp).await)
        }
    }

    /// The scheme list exactly as the backend returned it.
    pub async fn list_schemes_raw(&self) -> Result<Value, ServiceError> {
        self.get_json("/api/schemes").await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error(resp: reqwest::Response) -> ServiceError {
    let status = resp.status();
    parse_error_with_status(status, resp).await
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["error", "message", "detail"]
                .iter()
                .find_map(|k| v[*k].as_str().map(String::from))
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        StatusCode::BAD_REQUEST => ServiceError::InvalidInput(msg),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(msg),
        _ => ServiceError::Internal(msg),
    }
}

#[async_trait]
impl SchemeService for HttpService {
    async fn list_schemes(&self) -> Result<Vec<Scheme>, ServiceError> {
        self.get_json("/api/schemes").await
    }

    async fn list_criteria(&self, scheme_id: i64) -> Result<Vec<Criterion>, ServiceError> {
        self.get_json(&format!("/api/schemes/{scheme_id}/criteria/"))
            .await
    }

    async fn list_documents(&self, scheme_id: i64) -> Result<Vec<Document>, ServiceError> {
        self.get_json(&format!("/api/schemes/{scheme_id}/documents/"))
            .await
    }

    async fn submit_report(
        &self,
        report: &CreateSchemeReport,
        token: &str,
    ) -> Result<(), ServiceError> {
        self.post_authed("/api/feedback/scheme-reports/", report, token)
            .await
    }

    async fn save_scheme(&self, scheme_id: i64, token: &str) -> Result<(), ServiceError> {
        self.post_authed(
            &format!("/api/schemes/{scheme_id}/save/"),
            &serde_json::json!({ "scheme_id": scheme_id }),
            token,
        )
        .await
    }
}
