//! CLI argument definitions for the Scrub application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use scrub_core::config::BackendEnvironment;

/// Scrub — ask questions about a media file and jump to the key moments.
#[derive(Parser, Debug)]
#[command(name = "scrub", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Backend environment to talk to (local, deployed).
    #[arg(short = 'e', long = "environment", value_enum)]
    pub environment: Option<EnvironmentArg>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

/// Backend environment as a CLI value.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum EnvironmentArg {
    Local,
    Deployed,
}

impl From<EnvironmentArg> for BackendEnvironment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Local => BackendEnvironment::Local,
            EnvironmentArg::Deployed => BackendEnvironment::Deployed,
        }
    }
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SCRUB_CONFIG env var > ~/.scrub/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SCRUB_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the backend environment override, if any.
    pub fn resolve_environment(&self) -> Option<BackendEnvironment> {
        self.environment.map(BackendEnvironment::from)
    }

    /// Resolve the log level override, if any.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".scrub").join("config.toml");
    }
    PathBuf::from("config.toml")
}
