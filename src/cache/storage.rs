//! Persistent key-value media behind the TTL cache
//!
//! `SqliteStore` is the durable medium. `MemoryStore` lives for one process
//! and is the fallback when the database cannot be opened.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 2;

type Result<T> = std::result::Result<T, CacheError>;

/// String-keyed persistent map with best-effort durability.
///
/// No transactions, no typed values: the cache layer serializes envelopes
/// into the string values and owns all interpretation of them.
pub trait KeyValueStore: Send {
    /// Raw value stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; returns whether anything was removed
    fn remove(&self, key: &str) -> Result<bool>;

    /// Remove every key starting with `prefix`; returns the count removed
    fn remove_prefix(&self, prefix: &str) -> Result<usize>;

    /// All `(key, value)` pairs whose key starts with `prefix`, sorted by key
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>>;
}

/// SQLite-backed store, one row per key
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store at the default XDG cache location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Get the cache directory path (~/.cache/astrokit on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("astrokit"))
    }

    /// Open the store inside a specific directory
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            Self::nuke(&db_path)?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn,
            path: db_path,
        })
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn nuke(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            std::fs::remove_file(db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1", [key])?;
        Ok(deleted > 0)
    }

    fn remove_prefix(&self, prefix: &str) -> Result<usize> {
        // substr instead of LIKE: '_' in namespaces is a LIKE wildcard
        let deleted = self.conn.execute(
            "DELETE FROM kv_entries WHERE substr(key, 1, length(?1)) = ?1",
            [prefix],
        )?;
        Ok(deleted)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, value FROM kv_entries
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key",
        )?;
        let rows = stmt
            .query_map([prefix], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// In-process store with an optional byte quota.
///
/// A write that would exceed the quota fails and leaves the previous value
/// in place.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values exceed `bytes`
    #[cfg(test)]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            quota_bytes: Some(bytes),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if let Some(quota) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > quota {
                return Err(CacheError::Unavailable(format!(
                    "quota of {} bytes exceeded",
                    quota
                )));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }

    fn remove_prefix(&self, prefix: &str) -> Result<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        Ok(before - entries.len())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .lock()?
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = SqliteStore::open_at(dir.path()).unwrap();
        (storage, dir)
    }

    #[test]
    fn test_sqlite_write_read() {
        let (store, _dir) = test_storage();

        store.write("astrokit_moon_data", "{\"x\":1}").unwrap();

        assert_eq!(
            store.read("astrokit_moon_data").unwrap().as_deref(),
            Some("{\"x\":1}")
        );
        assert_eq!(store.read("missing").unwrap(), None);
    }

    #[test]
    fn test_sqlite_overwrite() {
        let (store, _dir) = test_storage();

        store.write("k", "v1").unwrap();
        store.write("k", "v2").unwrap();

        assert_eq!(store.read("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_sqlite_remove() {
        let (store, _dir) = test_storage();

        store.write("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_sqlite_prefix_treats_underscore_literally() {
        let (store, _dir) = test_storage();

        store.write("astrokit_a", "1").unwrap();
        store.write("astrokit_b", "2").unwrap();
        store.write("astrokitXc", "3").unwrap();
        store.write("other_d", "4").unwrap();

        let scanned = store.scan_prefix("astrokit_").unwrap();
        assert_eq!(
            scanned.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["astrokit_a", "astrokit_b"]
        );

        assert_eq!(store.remove_prefix("astrokit_").unwrap(), 2);
        assert_eq!(store.read("astrokitXc").unwrap().as_deref(), Some("3"));
        assert_eq!(store.read("other_d").unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn test_sqlite_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = SqliteStore::open_at(dir.path()).unwrap();
            store.write("k", "durable").unwrap();
        }
        let store = SqliteStore::open_at(dir.path()).unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("durable"));
    }

    #[test]
    fn test_sqlite_schema_mismatch_rebuilds() {
        let dir = TempDir::new().unwrap();
        {
            let conn = Connection::open(dir.path().join("cache.db")).unwrap();
            conn.execute_batch("CREATE TABLE legacy (x INTEGER);")
                .unwrap();
            conn.pragma_update(None, "user_version", 1).unwrap();
        }

        let store = SqliteStore::open_at(dir.path()).unwrap();
        store.write("k", "v").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_store_basics() {
        let store = MemoryStore::new();

        store.write("ns_a", "1").unwrap();
        store.write("ns_b", "2").unwrap();
        store.write("nt_c", "3").unwrap();

        assert_eq!(store.scan_prefix("ns_").unwrap().len(), 2);
        assert_eq!(store.remove_prefix("ns_").unwrap(), 2);
        assert_eq!(store.read("nt_c").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(10);

        store.write("k", "12345").unwrap();
        // Replacing the same key only counts the new value
        store.write("k", "123456789").unwrap();

        let err = store.write("k2", "x").unwrap_err();
        assert!(matches!(err, CacheError::Unavailable(_)));
        assert_eq!(store.read("k2").unwrap(), None);
        assert_eq!(store.read("k").unwrap().as_deref(), Some("123456789"));
    }
}
