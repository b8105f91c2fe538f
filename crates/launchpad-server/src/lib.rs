pub mod config;
mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use launchpad_service::HttpService;
use tokio::net::TcpListener;

pub use config::ProxyConfig;
pub use routes::{build_router, AppState, InnerAppState, FETCH_ERROR_MESSAGE};

pub async fn serve(listener: TcpListener, config: &ProxyConfig) -> Result<()> {
    let downstream =
        HttpService::with_timeout(&config.downstream_url, config.downstream_timeout())?;
    let app = build_router(Arc::new(InnerAppState { downstream }));
    axum::serve(listener, app).await?;
    Ok(())
}
