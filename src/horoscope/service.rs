//! Cache-first horoscope lookups
//!
//! Lookup order: fresh cache entry, then one upstream fetch, then locally
//! generated offline text. Only one fetch per key is in flight at a time;
//! later callers for the same key wait for it and read its cached result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex as AsyncMutex;

use super::offline::offline_text;
use super::{Horoscope, HoroscopeApi, HoroscopeSource, ZodiacSign};
use crate::cache::key::horoscope_key;
use crate::cache::{CacheTtl, TtlCache};
use crate::error::{Error, Result};

/// Maximum concurrent upstream fetches for `daily_all`
const CONCURRENT_FETCHES: usize = 4;

/// Cache handle shared between the service and its fetch tasks
pub type SharedCache = Arc<Mutex<TtlCache>>;

pub struct HoroscopeService<A: HoroscopeApi + 'static> {
    api: Arc<A>,
    cache: SharedCache,
    in_flight: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<A: HoroscopeApi + 'static> HoroscopeService<A> {
    pub fn new(api: A, cache: SharedCache) -> Self {
        Self {
            api: Arc::new(api),
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Horoscope for `sign` on `date`, never failing.
    ///
    /// Upstream failures produce offline text labelled `Offline`, which is
    /// not cached so the next call tries the service again.
    pub async fn daily(&self, sign: ZodiacSign, date: NaiveDate) -> Horoscope {
        match self.try_daily(sign, date).await {
            Ok(horoscope) => horoscope,
            Err(e) => {
                log::warn!("Horoscope fetch for {} failed, using offline text: {}", sign, e);
                Horoscope {
                    sign,
                    date,
                    text: offline_text(sign, date),
                    source: HoroscopeSource::Offline,
                }
            }
        }
    }

    /// Cached or live horoscope; upstream errors are returned to the caller.
    ///
    /// The fetch runs in its own task. If the caller goes away mid-fetch the
    /// result still lands in the cache.
    pub async fn try_daily(&self, sign: ZodiacSign, date: NaiveDate) -> Result<Horoscope> {
        let key = horoscope_key(sign.name(), date);

        if let Some(text) = self.cached(&key) {
            return Ok(Self::horoscope(sign, date, text, HoroscopeSource::Cached));
        }

        let guard = self.key_lock(&key).lock_owned().await;

        // Whoever held the lock before us may have filled the cache
        if let Some(text) = self.cached(&key) {
            drop(guard);
            self.release(&key);
            return Ok(Self::horoscope(sign, date, text, HoroscopeSource::Cached));
        }

        let key_for_release = key.clone();
        let api = Arc::clone(&self.api);
        let cache = Arc::clone(&self.cache);
        let task = tokio::spawn(async move {
            let _in_flight = guard;
            let text = api.fetch_daily(sign, date).await?;
            if let Ok(store) = cache.lock() {
                store.set(&key, &text, CacheTtl::HOROSCOPE);
            }
            Ok::<_, Error>(text)
        });

        let fetched = task
            .await
            .map_err(|e| Error::Other(format!("horoscope fetch task failed: {}", e)));
        self.release(&key_for_release);
        let text = fetched??;

        Ok(Self::horoscope(sign, date, text, HoroscopeSource::Live))
    }

    /// All twelve signs, in zodiac order
    pub async fn daily_all(&self, date: NaiveDate) -> Vec<Horoscope> {
        let mut all: Vec<Horoscope> = stream::iter(ZodiacSign::ALL)
            .map(|sign| self.daily(sign, date))
            .buffer_unordered(CONCURRENT_FETCHES)
            .collect()
            .await;
        all.sort_by_key(|h| h.sign);
        all
    }

    fn cached(&self, key: &str) -> Option<String> {
        let cache = self.cache.lock().ok()?;
        cache.get::<String>(key)
    }

    fn key_lock(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Locks nobody holds or waits on belong to finished fetches
        in_flight.retain(|_, lock| Arc::strong_count(lock) > 1);
        Arc::clone(in_flight.entry(key.to_string()).or_default())
    }

    /// Drop the lock for `key` once no other caller is waiting on it
    fn release(&self, key: &str) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if in_flight.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            in_flight.remove(key);
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        self.in_flight.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn horoscope(
        sign: ZodiacSign,
        date: NaiveDate,
        text: String,
        source: HoroscopeSource,
    ) -> Horoscope {
        Horoscope {
            sign,
            date,
            text,
            source,
        }
    }
}
