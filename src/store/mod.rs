//! Persistence of waitlist signups.
//!
//! The handler only ever writes through the `WaitlistStore` trait. A store is created once per
//! process and shared as `Arc<dyn WaitlistStore>`; every write is independent of the others.

mod memory;
mod postgres;

pub use memory::MemoryWaitlistStore;
pub use postgres::PgWaitlistStore;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::web::types::WaitlistEmail;

/// Identifies the form the signups come from.
pub const WAITLIST_SOURCE: &str = "coming-soon-page";

// ###################################
// ->   TRAIT
// ###################################
/// A durable key-value table of waitlist entries, keyed by email.
#[async_trait]
pub trait WaitlistStore: Send + Sync + 'static {
    /// Writes a single entry. An entry with the same email gets overwritten.
    async fn put_entry(&self, entry: &WaitlistEntry) -> StoreResult<()>;
}

// ###################################
// ->   STRUCTS
// ###################################
/// A single waitlist signup as it gets written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    email: String,
    timestamp: String,
    source: &'static str,
}

impl WaitlistEntry {
    pub fn new(email: &WaitlistEmail, accepted_at: DateTime<Utc>) -> Self {
        WaitlistEntry {
            email: email.as_ref().to_owned(),
            timestamp: accepted_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            source: WAITLIST_SOURCE,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// ISO-8601 UTC timestamp of when the signup was accepted.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn source(&self) -> &str {
        self.source
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(String),
    #[error("the in-memory store lock was poisoned")]
    LockPoisoned,
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
