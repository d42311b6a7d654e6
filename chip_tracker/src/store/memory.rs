//! In-memory session store.

use super::{
    SessionStore,
    errors::{StoreError, StoreResult},
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Process-local store backed by a `HashMap`
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries.values().filter(|e| e.is_live(now)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expiry timestamp of a live entry
    #[must_use]
    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries
            .get(key)
            .filter(|e| e.is_live(Utc::now()))
            .map(|e| e.expires_at)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self
            .entries
            .get(key)
            .filter(|e| e.is_live(Utc::now()))
            .map(|e| e.value.clone()))
    }

    fn set(&mut self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()> {
        // Drop anything that has already expired while we're here.
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(StoreError::InvalidTtl(ttl))?;
        self.entries.retain(|_, e| e.is_live(now));
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
