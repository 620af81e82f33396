//! HTTP client for the remote daily horoscope service

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use super::{HoroscopeApi, ZodiacSign};
use crate::error::{ApiError, Result};

/// Default horoscope service host
pub const DEFAULT_API_HOST: &str = "https://horoscope-app-api.vercel.app";

const DAILY_PATH: &str = "/horoscope";

/// Stay well under the public service's limits
const RATE_LIMIT_PER_SECOND: u32 = 4;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `GET /horoscope/{sign}?date=YYYY-MM-DD` body
#[derive(Debug, Deserialize)]
struct DailyResponse {
    sign: String,
    date: String,
    horoscope: String,
}

pub struct HoroscopeClient {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HoroscopeClient {
    /// Create a client for `api_host` (scheme and host, no trailing path)
    pub fn new(api_host: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let per_second = NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            http,
            base_url: api_host.trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HoroscopeApi for HoroscopeClient {
    async fn fetch_daily(&self, sign: ZodiacSign, date: NaiveDate) -> Result<String> {
        self.rate_limiter.until_ready().await;

        let slug = sign.name().to_lowercase();
        let url = format!("{}{}/{}", self.base_url, DAILY_PATH, slug);
        let day = date.format("%Y-%m-%d").to_string();
        log::debug!("GET {} date={}", url, day);

        let response = self
            .http
            .get(&url)
            .query(&[("date", day.as_str())])
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let body = response.json::<DailyResponse>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                if !body.sign.eq_ignore_ascii_case(&slug) || body.date != day {
                    return Err(ApiError::InvalidResponse(format!(
                        "Asked for {} on {}, got {} on {}",
                        slug, day, body.sign, body.date
                    ))
                    .into());
                }
                let text = body.horoscope.trim().to_string();
                if text.is_empty() {
                    return Err(
                        ApiError::InvalidResponse("Empty horoscope text".to_string()).into(),
                    );
                }
                Ok(text)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(format!(
                "horoscope for {} on {}",
                sign, day
            ))
            .into()),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}
