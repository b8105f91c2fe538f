pub mod health;
pub mod schemes;

use std::sync::Arc;

use axum::Router;
use launchpad_service::HttpService;
use tower_http::cors::CorsLayer;

pub use schemes::FETCH_ERROR_MESSAGE;

pub struct InnerAppState {
    /// Client for the backend the proxy forwards to.
    pub downstream: HttpService,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(schemes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
