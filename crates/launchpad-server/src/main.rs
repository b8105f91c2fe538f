use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use launchpad_server::ProxyConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ProxyConfig::parse();
    let addr = config.addr();

    let listener = TcpListener::bind(addr).await?;
    info!("launchpad-server listening on http://{addr}");
    info!("downstream: {}", config.downstream_url);

    launchpad_server::serve(listener, &config).await?;
    Ok(())
}
