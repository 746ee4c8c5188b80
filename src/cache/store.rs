//! Cache Store Module
//!
//! Synchronous storage engine combining HashMap storage with LRU tracking
//! and TTL expiration. Values are opaque byte payloads.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{Result, StoreError};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    /// Lifetime applied when a write does not name one; None = keep forever
    default_ttl: Option<Duration>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` payloads.
    pub fn new(max_entries: usize, default_ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a payload, replacing any previous entry for `key` wholesale.
    ///
    /// At capacity the least recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidRequest("Key cannot be empty".to_string()));
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(StoreError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted_key) => {
                    self.entries.remove(&evicted_key);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(StoreError::CacheFull(
                        "Cache is full and eviction failed".to_string(),
                    ));
                }
            }
        }

        let entry = CacheEntry::new(value, ttl.or(self.default_ttl));
        self.lru.touch(&key);
        self.entries.insert(key, entry);

        self.stats.record_write();
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Returns the payload for `key` if present and not expired.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Result<Vec<u8>> {
        self.get_with_ttl(key).map(|(value, _)| value)
    }

    // == Get With TTL ==
    /// Like `get`, also returning the remaining lifetime (None = never expires).
    pub fn get_with_ttl(&mut self, key: &str) -> Result<(Vec<u8>, Option<Duration>)> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(StoreError::NotFound(key.to_string()));
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return Err(StoreError::Expired(key.to_string()));
        }

        let found = (entry.value.clone(), entry.ttl_remaining());
        self.stats.record_hit();
        self.lru.touch(key);
        Ok(found)
    }

    // == Delete ==
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            Ok(())
        } else {
            Err(StoreError::NotFound(key.to_string()))
        }
    }

    // == Clear ==
    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const HOUR: Duration = Duration::from_secs(3600);

    fn store() -> CacheStore {
        CacheStore::new(100, Some(HOUR))
    }

    #[test]
    fn test_store_new() {
        let store = store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_entries(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store();

        store.set("test".to_string(), b"payload".to_vec(), None).unwrap();

        assert_eq!(store.get("test").unwrap(), b"payload");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store();
        assert!(matches!(store.get("missing"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_store_get_with_ttl_uses_default() {
        let mut store = store();
        store.set("test".to_string(), b"v".to_vec(), None).unwrap();

        let (_, ttl) = store.get_with_ttl("test").unwrap();
        let ttl = ttl.unwrap();
        assert!(ttl <= HOUR);
        assert!(ttl > HOUR - Duration::from_secs(5));
    }

    #[test]
    fn test_store_explicit_ttl_overrides_default() {
        let mut store = store();
        store
            .set("test".to_string(), b"v".to_vec(), Some(Duration::from_secs(10)))
            .unwrap();

        let (_, ttl) = store.get_with_ttl("test").unwrap();
        assert!(ttl.unwrap() <= Duration::from_secs(10));
    }

    #[test]
    fn test_store_without_default_never_expires() {
        let mut store = CacheStore::new(10, None);
        store.set("test".to_string(), b"v".to_vec(), None).unwrap();

        let (_, ttl) = store.get_with_ttl("test").unwrap();
        assert!(ttl.is_none());
    }

    #[test]
    fn test_store_delete() {
        let mut store = store();

        store.set("test".to_string(), b"v".to_vec(), None).unwrap();
        store.delete("test").unwrap();

        assert!(store.is_empty());
        assert!(matches!(store.get("test"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("test"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_store_overwrite_replaces_wholesale() {
        let mut store = store();

        store
            .set("test".to_string(), b"old".to_vec(), Some(Duration::from_secs(5)))
            .unwrap();
        store.set("test".to_string(), b"new".to_vec(), None).unwrap();

        let (value, ttl) = store.get_with_ttl("test").unwrap();
        assert_eq!(value, b"new");
        assert!(ttl.unwrap() > Duration::from_secs(5));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store();

        store
            .set("test".to_string(), b"v".to_vec(), Some(Duration::from_millis(50)))
            .unwrap();
        assert!(store.get("test").is_ok());

        sleep(Duration::from_millis(80));

        assert!(matches!(store.get("test"), Err(StoreError::Expired(_))));
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3, Some(HOUR));

        for key in ["a", "b", "c"] {
            store.set(key.to_string(), b"v".to_vec(), None).unwrap();
        }
        store.get("a").unwrap();
        store.set("d".to_string(), b"v".to_vec(), None).unwrap();

        assert_eq!(store.len(), 3);
        assert!(store.get("a").is_ok());
        assert!(matches!(store.get("b"), Err(StoreError::NotFound(_))));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_zero_capacity_is_full() {
        let mut store = CacheStore::new(0, Some(HOUR));

        let result = store.set("test".to_string(), b"v".to_vec(), None);
        assert!(matches!(result, Err(StoreError::CacheFull(_))));
    }

    #[test]
    fn test_store_stats() {
        let mut store = store();

        store.set("test".to_string(), b"v".to_vec(), None).unwrap();
        store.get("test").unwrap();
        let _ = store.get("missing");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = store();

        store
            .set("short".to_string(), b"v".to_vec(), Some(Duration::from_millis(50)))
            .unwrap();
        store.set("long".to_string(), b"v".to_vec(), None).unwrap();

        sleep(Duration::from_millis(80));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_ok());
    }

    #[test]
    fn test_store_clear() {
        let mut store = store();
        store.set("a".to_string(), b"v".to_vec(), None).unwrap();
        store.set("b".to_string(), b"v".to_vec(), None).unwrap();

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.stats().writes, 2);
    }

    #[test]
    fn test_store_rejects_bad_keys_and_values() {
        let mut store = store();

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(matches!(
            store.set(long_key, b"v".to_vec(), None),
            Err(StoreError::InvalidRequest(_))
        ));

        assert!(matches!(
            store.set(String::new(), b"v".to_vec(), None),
            Err(StoreError::InvalidRequest(_))
        ));

        let large_value = vec![0u8; MAX_VALUE_SIZE + 1];
        assert!(matches!(
            store.set("test".to_string(), large_value, None),
            Err(StoreError::InvalidRequest(_))
        ));
    }
}
