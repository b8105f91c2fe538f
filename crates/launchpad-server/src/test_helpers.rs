use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use launchpad_service::HttpService;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::routes::{build_router, InnerAppState};

/// Scripted stand-in for the schemes backend.
///
/// Statuses are plain numbers so tests can write `criteria_status: 500`.
#[derive(Debug, Clone)]
pub struct MockBackend {
    pub schemes: Value,
    pub schemes_status: u16,
    pub schemes_delay: Option<Duration>,
    /// Served instead of `schemes` when set, as `text/html`.
    pub schemes_raw_body: Option<String>,
    pub criteria: Value,
    pub criteria_status: u16,
    pub documents: Value,
    pub documents_status: u16,
    /// Applied to both detail endpoints.
    pub details_delay: Option<Duration>,
    pub report_status: u16,
    pub save_status: u16,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            schemes: sample_schemes(),
            schemes_status: 200,
            schemes_delay: None,
            schemes_raw_body: None,
            criteria: json!([
                { "id": 1, "scheme": 1, "description": "Small or marginal farmer", "value": "land below 2 ha" },
                { "id": 2, "scheme": 1, "description": "Resident of India" }
            ]),
            criteria_status: 200,
            documents: json!([
                { "id": 1, "scheme": 1, "document_name": "Aadhaar card" },
                { "id": 2, "scheme": 1, "document_name": "Land ownership record" }
            ]),
            documents_status: 200,
            details_delay: None,
            report_status: 201,
            save_status: 201,
        }
    }
}

/// Three schemes: one with a long description and an apply link, one
/// short, and one with no id.
pub fn sample_schemes() -> Value {
    json!([
        {
            "id": 1,
            "title": "PM Kisan Samman Nidhi",
            "description": "Income support of Rs. 6000 per year to all landholding farmer families, paid in three equal instalments directly into their bank accounts. ".repeat(4),
            "department": { "state": "Kerala", "department_name": "Agriculture" },
            "beneficiaries": [{ "beneficiary_type": "Farmers" }],
            "pdf_url": "https://launchpad-pdf.s3.amazonaws.com/pm-kisan.pdf",
            "scheme_link": "https://pmkisan.gov.in",
            "created_at": "2024-03-05 10:22:01"
        },
        {
            "id": 2,
            "title": "Post Matric Scholarship",
            "description": "Tuition support.",
            "department": { "state": "Punjab", "department_name": "Social Justice" },
            "beneficiaries": [{ "beneficiary_type": "Students" }],
            "created_at": "2023-11-20 08:00:00"
        },
        {
            "title": "Unindexed draft scheme",
            "description": "Imported without an identifier."
        }
    ])
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Every request a mock backend received, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    fn record(&self, req: RecordedRequest) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).push(req);
    }

    pub fn all(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count_path(&self, path: &str) -> usize {
        self.all().iter().filter(|r| r.path == path).count()
    }

    pub fn last_for(&self, path: &str) -> Option<RecordedRequest> {
        self.all().into_iter().rev().find(|r| r.path == path)
    }
}

struct MockState {
    backend: MockBackend,
    log: RequestLog,
}

type SharedMock = Arc<MockState>;

fn mock_router(state: SharedMock) -> Router {
    Router::new()
        .route("/api/schemes", get(mock_schemes))
        .route("/api/schemes/{id}/criteria/", get(mock_criteria))
        .route("/api/schemes/{id}/documents/", get(mock_documents))
        .route("/api/schemes/{id}/save/", post(mock_save))
        .route("/api/feedback/scheme-reports/", post(mock_report))
        .with_state(state)
}

fn record(state: &MockState, method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
    state.log.record(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(body).ok(),
    });
}

fn respond(status: u16, body: &Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_success() {
        (status, Json(body.clone())).into_response()
    } else {
        (status, Json(json!({ "detail": "mock failure" }))).into_response()
    }
}

async fn mock_schemes(
    State(state): State<SharedMock>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);
    if let Some(delay) = state.backend.schemes_delay {
        tokio::time::sleep(delay).await;
    }
    match &state.backend.schemes_raw_body {
        Some(raw) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            raw.clone(),
        )
            .into_response(),
        None => respond(state.backend.schemes_status, &state.backend.schemes),
    }
}

async fn mock_criteria(
    State(state): State<SharedMock>,
    Path(_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);
    if let Some(delay) = state.backend.details_delay {
        tokio::time::sleep(delay).await;
    }
    respond(state.backend.criteria_status, &state.backend.criteria)
}

async fn mock_documents(
    State(state): State<SharedMock>,
    Path(_id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);
    if let Some(delay) = state.backend.details_delay {
        tokio::time::sleep(delay).await;
    }
    respond(state.backend.documents_status, &state.backend.documents)
}

async fn mock_report(
    State(state): State<SharedMock>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);
    respond(state.backend.report_status, &json!({ "id": 1, "status": "open" }))
}

async fn mock_save(
    State(state): State<SharedMock>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(&state, &method, &uri, &headers, &body);
    respond(state.backend.save_status, &json!({ "scheme_id": id, "saved": true }))
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    /// Requests received; always empty for the proxy itself.
    pub requests: RequestLog,
    _handle: tokio::task::JoinHandle<()>,
}

async fn spawn_router(app: Router, requests: RequestLog) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        requests,
        _handle: handle,
    }
}

/// Spawn a mock backend on a random port.
pub async fn spawn_mock_backend(backend: MockBackend) -> TestServer {
    let log = RequestLog::default();
    let state = Arc::new(MockState {
        backend,
        log: log.clone(),
    });
    spawn_router(mock_router(state), log).await
}

/// The proxy router pointed at `downstream`, with no downstream timeout.
pub fn proxy_router(downstream: &str) -> Router {
    build_router(Arc::new(InnerAppState {
        downstream: HttpService::new(downstream),
    }))
}

pub fn proxy_router_with_timeout(downstream: &str, timeout: Duration) -> Router {
    build_router(Arc::new(InnerAppState {
        downstream: HttpService::with_timeout(downstream, timeout).unwrap(),
    }))
}

/// Spawn the proxy on a random port, forwarding to `downstream`.
pub async fn spawn_proxy(downstream: &str) -> TestServer {
    spawn_router(proxy_router(downstream), RequestLog::default()).await
}
