//! No-op Store
//!
//! Accepts every write and never holds anything, so each fetch goes to the
//! remote. Useful for disabling caching without changing the fetcher.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::cache::KeyValueStore;
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl KeyValueStore for NoopStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(None)
    }

    async fn get_with_ttl(
        &self,
        _key: &str,
    ) -> Result<Option<(Vec<u8>, Option<Duration>)>, StoreError> {
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        _ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        trace!(key, bytes = value.len(), "noop store dropped write");
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_store_never_hits() {
        let store = NoopStore;

        store.set("test", b"v".to_vec(), None).await.unwrap();

        assert_eq!(store.get("test").await.unwrap(), None);
        assert!(!store.delete("test").await.unwrap());
        assert_eq!(store.store_type(), "noop");
    }
}
