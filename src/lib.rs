//! A waitlist signup service: accepts an email over HTTP, checks its shape and stores it with a
//! timestamp and a source tag.

pub mod app;
pub mod config;
mod error;
pub mod store;
pub mod web;

pub use app::{App, AppState};
pub use error::{Error, Result};
pub use web::serve::serve;

use tracing_subscriber::EnvFilter;

/// Human readable, compact logs for local development.
/// Respects `RUST_LOG`, defaults to debug for this crate and `tower_http`.
pub fn init_dbg_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("waitlist=debug,tower_http=debug"));

    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(filter)
        .compact()
        .init();
}

/// Structured JSON logs, one object per line.
pub fn init_production_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(filter)
        .init();
}
