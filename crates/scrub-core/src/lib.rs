//! Scrub core crate - shared errors, configuration, and domain types.
//!
//! Everything the subsystem crates have in common lives here: the
//! `ScrubError` umbrella, the TOML-backed `ScrubConfig`, and the wire and
//! conversation types exchanged between session, media, and client crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BackendConfig, BackendEnvironment, GeneralConfig, ScrubConfig};
pub use error::{Result, ScrubError};
pub use types::*;
