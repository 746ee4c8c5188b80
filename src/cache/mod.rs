//! Cache Module
//!
//! In-memory storage engine with TTL expiration and LRU eviction, and the
//! key-value store implementations the fetcher can sit on.

mod entry;
mod lru;
mod memory;
mod noop;
mod stats;
mod store;


pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memory::MemoryStore;
pub use noop::NoopStore;
pub use stats::CacheStats;
pub use store::CacheStore;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Key-Value Store ==
/// Capability set the fetcher needs from a cache backend.
///
/// Implementations are content-type agnostic; callers encode values before
/// `set` and decode after `get`. Absence and expiry both read as `Ok(None)`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Payload plus remaining lifetime; `None` lifetime means no expiry.
    async fn get_with_ttl(
        &self,
        key: &str,
    ) -> Result<Option<(Vec<u8>, Option<Duration>)>, StoreError>;

    /// Writes `value`, using the store's own default when `ttl` is `None`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
        -> Result<(), StoreError>;

    /// Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn store_type(&self) -> &'static str;
}
