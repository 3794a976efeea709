use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

/// Snapshot of the cache contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

struct CacheEntry {
    payload: serde_json::Value,
    expires_at: Instant,
}

/// In-memory response cache with a fixed time-to-live.
///
/// Entries are evicted lazily: an expired entry is reported as a miss and
/// overwritten by the next `insert` for the same key.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The map only ever holds whole entries, so a poisoned lock is still consistent
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: &str, payload: serde_json::Value) {
        self.insert_at(key, payload, Instant::now());
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<serde_json::Value> {
        let entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => {
                debug!("Cache hit: {}", key);
                Some(entry.payload.clone())
            }
            Some(_) => {
                debug!("Cache entry expired: {}", key);
                None
            }
            None => {
                debug!("Cache miss: {}", key);
                None
            }
        }
    }

    fn insert_at(&self, key: &str, payload: serde_json::Value, now: Instant) {
        let entry = CacheEntry {
            payload,
            expires_at: now + self.ttl,
        };
        self.lock_entries().insert(key.to_string(), entry);
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    /// Keys are sorted so the snapshot is stable across calls
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock_entries();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}
