//! Read-through TTL cache over a `KeyValueStore`
//!
//! Entries are JSON envelopes `{payload, writtenAtEpochMs, ttlMs}` stored
//! under `<namespace>_<key>`. Nothing in here fails outward: a broken medium,
//! a corrupted envelope or a payload of the wrong shape all read as a miss,
//! and a failed write is logged and reported as `false`.

use std::sync::Arc;
use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::key::{namespaced_key, namespace_prefix};
use super::storage::KeyValueStore;

/// Persisted envelope around a cached payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub payload: T,
    pub written_at_epoch_ms: i64,
    pub ttl_ms: i64,
}

impl<T> CacheEntry<T> {
    /// Valid iff `now - writtenAtEpochMs < ttlMs`
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.written_at_epoch_ms) < self.ttl_ms
    }
}

/// One stored entry as seen by `cache list`
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// Key without the namespace prefix
    pub key: String,
    /// `None` when the envelope could not be parsed
    pub written_at_epoch_ms: Option<i64>,
    pub ttl_ms: Option<i64>,
    pub fresh: bool,
    pub size_bytes: usize,
}

/// Statistics about cache state
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
    pub total_size_bytes: usize,
    pub oldest_entry_ms: Option<i64>,
    pub newest_entry_ms: Option<i64>,
}

pub struct TtlCache {
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    namespace: String,
}

impl TtlCache {
    pub fn new(store: Box<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self::with_clock(store, namespace, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Box<dyn KeyValueStore>,
        namespace: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fresh payload for `key`, or `None`.
    ///
    /// Stale, malformed and mistyped entries are evicted on the way out.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = namespaced_key(&self.namespace, key);

        let raw = match self.store.read(&full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("Cache miss: {}", full_key);
                return None;
            }
            Err(e) => {
                log::warn!("Cache read failed for {}: {}", full_key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Discarding malformed cache entry {}: {}", full_key, e);
                self.evict(&full_key);
                return None;
            }
        };

        if !entry.is_fresh(self.clock.now_ms()) {
            log::debug!("Cache stale: {}", full_key);
            self.evict(&full_key);
            return None;
        }

        log::debug!("Cache hit: {}", full_key);
        Some(entry.payload)
    }

    /// Store `payload` under `key` for `ttl`, replacing any previous entry.
    ///
    /// Returns `false` if the medium rejected the write.
    pub fn set<T: Serialize>(&self, key: &str, payload: &T, ttl: Duration) -> bool {
        let full_key = namespaced_key(&self.namespace, key);
        let entry = CacheEntry {
            payload,
            written_at_epoch_ms: self.clock.now_ms(),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize cache entry {}: {}", full_key, e);
                return false;
            }
        };

        match self.store.write(&full_key, &json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cache write failed for {}: {}", full_key, e);
                false
            }
        }
    }

    /// Read-through: cached value if fresh, otherwise compute, store and return.
    ///
    /// The computed value is returned even when it could not be stored.
    pub fn get_or_insert_with<T, F>(&self, key: &str, ttl: Duration, compute: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.get(key) {
            return cached;
        }
        let value = compute();
        self.set(key, &value, ttl);
        value
    }

    /// Remove `key`; a missing key is not an error
    pub fn invalidate(&self, key: &str) -> bool {
        let full_key = namespaced_key(&self.namespace, key);
        match self.store.remove(&full_key) {
            Ok(removed) => removed,
            Err(e) => {
                log::warn!("Cache invalidate failed for {}: {}", full_key, e);
                false
            }
        }
    }

    /// Remove every entry whose key starts with `prefix`.
    ///
    /// An empty prefix clears the whole namespace.
    pub fn clear_all(&self, prefix: &str) -> usize {
        let full_prefix = format!("{}{}", namespace_prefix(&self.namespace), prefix);
        match self.store.remove_prefix(&full_prefix) {
            Ok(count) => count,
            Err(e) => {
                log::warn!("Cache clear failed for {}*: {}", full_prefix, e);
                0
            }
        }
    }

    /// Remove stale and malformed entries; returns how many went
    pub fn purge_expired(&self) -> usize {
        let prefix = namespace_prefix(&self.namespace);
        self.entries()
            .into_iter()
            .filter(|info| !info.fresh)
            .filter(|info| self.store.remove(&format!("{}{}", prefix, info.key)).unwrap_or(false))
            .count()
    }

    /// Every entry in the namespace, fresh or not
    pub fn entries(&self) -> Vec<EntryInfo> {
        let prefix = namespace_prefix(&self.namespace);
        let rows = match self.store.scan_prefix(&prefix) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Cache scan failed: {}", e);
                return Vec::new();
            }
        };

        let now = self.clock.now_ms();
        rows.into_iter()
            .map(|(key, raw)| {
                let parsed = serde_json::from_str::<CacheEntry<IgnoredAny>>(&raw).ok();
                EntryInfo {
                    key: key[prefix.len()..].to_string(),
                    written_at_epoch_ms: parsed.as_ref().map(|e| e.written_at_epoch_ms),
                    ttl_ms: parsed.as_ref().map(|e| e.ttl_ms),
                    fresh: parsed.as_ref().is_some_and(|e| e.is_fresh(now)),
                    size_bytes: raw.len(),
                }
            })
            .collect()
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries();
        let fresh: Vec<_> = entries.iter().filter(|e| e.fresh).collect();

        CacheStats {
            total_entries: entries.len(),
            fresh_entries: fresh.len(),
            stale_entries: entries.len() - fresh.len(),
            total_size_bytes: entries.iter().map(|e| e.size_bytes).sum(),
            oldest_entry_ms: entries.iter().filter_map(|e| e.written_at_epoch_ms).min(),
            newest_entry_ms: entries.iter().filter_map(|e| e.written_at_epoch_ms).max(),
        }
    }

    fn evict(&self, full_key: &str) {
        if let Err(e) = self.store.remove(full_key) {
            log::warn!("Failed to evict {}: {}", full_key, e);
        }
    }
}
