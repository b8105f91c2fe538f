use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "launchpad", about = "Browse schemes and open their apply panel")]
pub struct TuiConfig {
    /// Backend that serves `/api/schemes` and scheme details
    #[arg(long, env = "LAUNCHPAD_API_BASE_URL", default_value = "http://localhost:8000")]
    pub api_base_url: String,

    /// Bearer token for reporting and saving schemes
    #[arg(long, env = "LAUNCHPAD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where to write the log; the terminal belongs to the UI
    #[arg(long, env = "LAUNCHPAD_LOG_FILE", default_value = "launchpad-tui.log")]
    pub log_file: PathBuf,
}

impl TuiConfig {
    /// The token, ignoring an empty value.
    pub fn token(&self) -> Option<String> {
        self.token.clone().filter(|t| !t.trim().is_empty())
    }
}
