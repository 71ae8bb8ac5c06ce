//! Scrub application binary - composition root.
//!
//! Ties the crates together into a single executable:
//! 1. Parse CLI arguments and load TOML configuration
//! 2. Initialize tracing with an env-filter
//! 3. Build the HTTP backend client for the selected environment
//! 4. Start a session over the client and a trace-only player
//! 5. Drive it from a line-oriented REPL until quit

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scrub_client::HttpBackendClient;
use scrub_core::config::ScrubConfig;
use scrub_media::NullPlayer;
use scrub_session::{BackendClient, SessionStateMachine};

mod cli;
mod repl;

use cli::CliArgs;

#[tokio::main]
async fn main() -> scrub_core::Result<()> {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    let mut config = ScrubConfig::load_or_default(&config_path);
    if let Some(environment) = args.resolve_environment() {
        config.backend.environment = environment;
    }

    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = HttpBackendClient::new(&config.backend)?;
    tracing::info!(origin = client.origin(), "Backend selected");

    let session = SessionStateMachine::new(
        Arc::new(client) as Arc<dyn BackendClient>,
        Arc::new(NullPlayer::new()),
    );

    repl::run(&session).await?;
    Ok(())
}
