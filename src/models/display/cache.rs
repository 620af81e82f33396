//! Cache entry display model

use serde::Serialize;
use tabled::Tabled;

use crate::cache::EntryInfo;
use crate::output::formatters::{format_duration_ms, format_size, format_timestamp_local};

/// Cache entry row for `cache list`.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CacheEntryDisplay {
    #[tabled(rename = "KEY")]
    pub key: String,

    #[tabled(rename = "WRITTEN")]
    pub written: String,

    #[tabled(rename = "TTL")]
    pub ttl: String,

    /// fresh, stale or corrupt
    #[tabled(rename = "STATUS")]
    pub status: &'static str,

    #[tabled(rename = "SIZE")]
    pub size: String,
}

impl From<EntryInfo> for CacheEntryDisplay {
    fn from(entry: EntryInfo) -> Self {
        let status = match (entry.fresh, entry.written_at_epoch_ms) {
            (true, _) => "fresh",
            (false, Some(_)) => "stale",
            (false, None) => "corrupt",
        };

        Self {
            key: entry.key,
            written: entry
                .written_at_epoch_ms
                .map(format_timestamp_local)
                .unwrap_or_else(|| "--".to_string()),
            ttl: entry
                .ttl_ms
                .map(format_duration_ms)
                .unwrap_or_else(|| "--".to_string()),
            status,
            size: format_size(entry.size_bytes),
        }
    }
}
