//! Key-value blob storage with expiry, used to keep an active session alive
//! across restarts.
//!
//! The engine only needs three calls, so any backend that can hold a few
//! bytes under a key for a limited time can implement [`SessionStore`]:
//!
//! - [`MemoryStore`]: process-local map, useful for tests and embedding
//! - [`FileStore`]: one file per key in a directory
//!
//! ## Example
//!
//! ```
//! use chip_tracker::store::{MemoryStore, SessionStore};
//! use chrono::Duration;
//!
//! let mut store = MemoryStore::new();
//! store.set("poker_session", b"{}", Duration::days(1)).unwrap();
//! assert_eq!(store.get("poker_session").unwrap(), Some(b"{}".to_vec()));
//!
//! store.remove("poker_session").unwrap();
//! assert_eq!(store.get("poker_session").unwrap(), None);
//! ```

pub mod errors;
pub mod file;
pub mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

use chrono::Duration;

/// Blob storage keyed by string with a time-to-live per entry
pub trait SessionStore {
    /// Fetch the value under `key`. Expired entries read as absent.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value. The entry
    /// expires `ttl` from now.
    fn set(&mut self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()>;

    /// Delete `key`. Removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()> {
        (**self).set(key, value, ttl)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
