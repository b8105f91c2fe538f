use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "launchpad-server", about = "Schemes proxy for the launchpad front end")]
pub struct ProxyConfig {
    /// Address to bind
    #[arg(long, env = "LAUNCHPAD_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "LAUNCHPAD_PORT", default_value = "3000")]
    pub port: u16,

    /// Backend that serves `/api/schemes`
    #[arg(long, env = "LAUNCHPAD_DOWNSTREAM_URL", default_value = "http://localhost:8000")]
    pub downstream_url: String,

    /// Give up on the backend after this many seconds.
    #[arg(long, env = "LAUNCHPAD_DOWNSTREAM_TIMEOUT", default_value = "30")]
    pub downstream_timeout: u64,
}

impl ProxyConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn downstream_timeout(&self) -> Duration {
        Duration::from_secs(self.downstream_timeout)
    }
}
