//! Scrub client crate - HTTP transport for the backend collaborator.

pub mod http;

pub use http::HttpBackendClient;
