use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use tracing::debug;

use super::{StoreError, StoreResult, WaitlistEntry, WaitlistStore};

/// Keeps the waitlist in a `HashMap` keyed by email. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryWaitlistStore {
    entries: RwLock<HashMap<String, WaitlistEntry>>,
}

impl MemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, email: &str) -> StoreResult<Option<WaitlistEntry>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(email).cloned())
    }

    pub fn len(&self) -> StoreResult<usize> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|len| len == 0)
    }
}

#[async_trait]
impl WaitlistStore for MemoryWaitlistStore {
    async fn put_entry(&self, entry: &WaitlistEntry) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(entry.email().to_owned(), entry.clone());
        debug!("{:<20} - {} entries", "memory_store", entries.len());

        Ok(())
    }
}
