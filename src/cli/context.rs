//! Command execution context
//!
//! Loads settings, opens the cache and resolves the output format once, so
//! command handlers only deal with their own arguments.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::{self, SqliteStore};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::config::Settings;
use crate::error::Result;
use crate::horoscope::client::DEFAULT_API_HOST;
use crate::horoscope::service::SharedCache;

/// Context for command execution containing settings, cache and runtime options.
pub struct CommandContext {
    /// Loaded configuration
    pub settings: Settings,
    /// Shared TTL cache (in-memory when `--no-cache`)
    pub cache: SharedCache,
    /// Output format after applying the config file default
    pub format: OutputFormat,
    /// Horoscope service host after applying overrides
    pub api_host: String,
    /// Directory holding the cache database, if one is in use
    pub cache_dir: Option<PathBuf>,
}

impl CommandContext {
    /// Build the context for one command run.
    ///
    /// # Errors
    /// Returns error if the config file exists but cannot be parsed.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let settings = Settings::load(opts.config_ref())?;
        let config = settings.config();

        let format = opts
            .format
            .or_else(|| {
                config
                    .preferences
                    .format
                    .as_deref()
                    .and_then(OutputFormat::from_name)
            })
            .unwrap_or_default();

        let api_host = opts
            .api_host_ref()
            .or(config.api_host.as_deref())
            .unwrap_or(DEFAULT_API_HOST)
            .to_string();

        let (cache, cache_dir) = if opts.no_cache {
            log::debug!("Cache disabled, using in-memory store");
            (cache::memory(), None)
        } else {
            let dir = match opts.cache_dir_ref() {
                Some(dir) => Some(PathBuf::from(dir)),
                None => SqliteStore::cache_dir().ok(),
            };
            (cache::open(opts.cache_dir_ref().map(Path::new)), dir)
        };

        Ok(Self {
            settings,
            cache: Arc::new(Mutex::new(cache)),
            format,
            api_host,
            cache_dir,
        })
    }

    /// Read-through lookup in the shared cache.
    ///
    /// A poisoned cache lock is treated like a broken medium: the value is
    /// computed and returned without caching.
    pub fn cached<T, F>(&self, key: &str, ttl: Duration, compute: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.cache.lock() {
            Ok(cache) => cache.get_or_insert_with(key, ttl, compute),
            Err(_) => {
                log::warn!("Cache lock poisoned, computing {} uncached", key);
                compute()
            }
        }
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }
}
