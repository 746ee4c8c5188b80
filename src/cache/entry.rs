//! Cache Entry Module
//!
//! Defines a stored payload together with its expiry metadata.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// An opaque payload held by the store until `expires_at`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Encoded value, opaque to the store
    pub value: Vec<u8>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` from now, or never.
    pub fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| now.saturating_add(ttl.as_millis() as u64));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// An entry is visible only while the current time is before `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired, None for entries that never expire.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            Duration::from_millis(expires.saturating_sub(now))
        })
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
