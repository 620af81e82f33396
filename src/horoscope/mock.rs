//! Mock horoscope source for testing
//!
//! Configure responses via builder methods, then hand it to a
//! `HoroscopeService` in place of the HTTP client.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{HoroscopeApi, ZodiacSign};
use crate::error::{ApiError, Result};

#[derive(Default)]
pub struct MockHoroscopeClient {
    /// Fail every call with a network error
    fail: bool,
    /// Simulated latency per call
    delay: Option<Duration>,
    /// Number of fetches made, shared with clones of the counter handle
    calls: Arc<AtomicUsize>,
}

impl MockHoroscopeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable upstream
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Handle for reading the call count after the mock has been moved
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Text the mock returns for `sign` on `date`
    pub fn text_for(sign: ZodiacSign, date: NaiveDate) -> String {
        format!("Mock horoscope for {} on {}", sign.name(), date)
    }
}

#[async_trait]
impl HoroscopeApi for MockHoroscopeClient {
    async fn fetch_daily(&self, sign: ZodiacSign, date: NaiveDate) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(ApiError::Network("Connection refused".to_string()).into());
        }

        Ok(Self::text_for(sign, date))
    }
}
