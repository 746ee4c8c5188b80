//! TTL Cleanup Task
//!
//! Expired entries are already invisible to lookups; this sweep reclaims
//! their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryStore;

/// Spawns a task that purges expired entries from `store` every `interval`.
///
/// The task runs until its handle is aborted.
///
/// # Example
/// ```ignore
/// let store = MemoryStore::new(1000, Some(Duration::from_secs(3600)));
/// let cleanup_handle = spawn_cleanup_task(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: MemoryStore, interval: Duration) -> JoinHandle<()> {
    // tokio intervals must be non-zero
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "starting TTL cleanup task"
        );

        let mut ticker = tokio::time::interval(interval);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = store.cleanup_expired().await;
            if removed > 0 {
                info!(removed, "TTL cleanup removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
