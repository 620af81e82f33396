//! Local TTL cache for computed and fetched values
//!
//! SQLite-backed by default, with an in-memory fallback when the database
//! cannot be opened. Caching is an optimization only: callers always get a
//! value, cached or not.

pub mod clock;
pub mod key;
pub mod storage;
pub mod ttl;

use std::path::Path;
use std::time::Duration;

/// Namespace for every key astrokit writes
pub const NAMESPACE: &str = "astrokit";

/// Cache TTL configuration per data type
pub struct CacheTtl;

impl CacheTtl {
    // Remote content refreshes during the day
    pub const HOROSCOPE: Duration = Duration::from_secs(60 * 60); // 1 hr
    pub const MERCURY: Duration = Duration::from_secs(60 * 60); // 1 hr

    // Pure calculations keyed by date
    pub const MOON: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr
    pub const NUMEROLOGY: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr

    pub const DEFAULT: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr
}

// Re-export main types
pub use clock::{Clock, SystemClock};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use ttl::{CacheStats, EntryInfo, TtlCache};

/// Open the cache in `dir` (or the default location).
///
/// Falls back to a process-local store if the database is unusable, so the
/// caller never has to handle a cache failure.
pub fn open(dir: Option<&Path>) -> TtlCache {
    let opened = match dir {
        Some(dir) => SqliteStore::open_at(dir),
        None => SqliteStore::open(),
    };

    match opened {
        Ok(store) => {
            log::debug!("Cache opened at {}", store.path().display());
            TtlCache::new(Box::new(store), NAMESPACE)
        }
        Err(e) => {
            log::warn!("Cache unavailable ({}), using in-memory cache", e);
            memory()
        }
    }
}

/// Process-local cache, used for `--no-cache`
pub fn memory() -> TtlCache {
    TtlCache::new(Box::new(MemoryStore::new()), NAMESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_at_dir_is_durable() {
        let dir = TempDir::new().unwrap();

        open(Some(dir.path())).set("k", &"v", CacheTtl::DEFAULT);

        let reopened = open(Some(dir.path()));
        assert_eq!(reopened.get::<String>("k").as_deref(), Some("v"));
        assert_eq!(reopened.namespace(), NAMESPACE);
    }

    #[test]
    fn test_open_falls_back_to_memory() {
        let dir = TempDir::new().unwrap();
        // A file where the directory should be
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let cache = open(Some(&blocker));
        assert!(cache.set("k", &1u8, CacheTtl::DEFAULT));
        assert_eq!(cache.get::<u8>("k"), Some(1));
    }

    #[test]
    fn test_ttl_policies() {
        assert_eq!(CacheTtl::HOROSCOPE, Duration::from_secs(3600));
        assert_eq!(CacheTtl::MERCURY, Duration::from_secs(3600));
        assert_eq!(CacheTtl::DEFAULT, Duration::from_secs(86_400));
    }
}
