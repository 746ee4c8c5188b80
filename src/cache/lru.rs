//! LRU Tracker Module
//!
//! Orders keys by last use so the memory store can pick an eviction victim.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order with a monotonic use counter.
///
/// The smallest tick in `by_tick` is the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    tick: u64,
    by_key: HashMap<String, u64>,
    by_tick: BTreeMap<u64, String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let tick = self.tick;
        self.tick += 1;

        if let Some(previous) = self.by_key.insert(key.to_string(), tick) {
            self.by_tick.remove(&previous);
        }
        self.by_tick.insert(tick, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.by_key.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.by_key.clear();
        self.by_tick.clear();
    }
}

#[cfg(test)]
impl LruTracker {
    fn peek_oldest(&self) -> Option<&str> {
        self.by_tick.first_key_value().map(|(_, key)| key.as_str())
    }

    fn len(&self) -> usize {
        self.by_key.len()
    }

    fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }
}
