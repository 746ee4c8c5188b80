//! Memory Store
//!
//! Shares a `CacheStore` engine behind an async lock so it can serve as the
//! fetcher's key-value store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore, KeyValueStore};
use crate::config::Config;
use crate::error::StoreError;

/// Thread-safe in-memory store. Clones share the same entries.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<CacheStore>>,
}

impl MemoryStore {
    pub fn new(max_entries: usize, default_ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheStore::new(max_entries, default_ttl))),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, Some(config.cache_ttl))
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }
}

/// Absence and expiry are both a plain miss for callers of the trait.
fn found_or_miss<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::NotFound(_)) | Err(StoreError::Expired(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        // write lock: lookups update LRU order and stats
        let mut cache = self.inner.write().await;
        found_or_miss(cache.get(key))
    }

    async fn get_with_ttl(
        &self,
        key: &str,
    ) -> Result<Option<(Vec<u8>, Option<Duration>)>, StoreError> {
        let mut cache = self.inner.write().await;
        found_or_miss(cache.get_with_ttl(key))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut cache = self.inner.write().await;
        cache.set(key.to_string(), value, ttl)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut cache = self.inner.write().await;
        found_or_miss(cache.delete(key)).map(|removed| removed.is_some())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.write().await.clear();
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}
