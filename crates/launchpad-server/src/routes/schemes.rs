use axum::{extract::State, http::StatusCode, routing::any, Json, Router};
use serde_json::{json, Value};
use tracing::error;

use super::AppState;

/// The only thing a caller learns when the backend fails.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching schemes";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schemes", any(fetch_schemes))
        .route("/api/fetchSchemes", any(fetch_schemes))
}

/// Forward to `{downstream}/api/schemes` and mirror the JSON payload.
async fn fetch_schemes(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .downstream
        .list_schemes_raw()
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                downstream = state.downstream.base_url(),
                "error fetching schemes: {e}"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": FETCH_ERROR_MESSAGE })),
            )
        })
}
