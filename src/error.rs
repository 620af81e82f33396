//! Error types for astrokit

use std::time::Duration;
use thiserror::Error;

/// Result type alias for astrokit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Upstream fetch errors from the remote horoscope service.
///
/// These are the only errors allowed to reach the presentation layer, and even
/// then the horoscope service substitutes offline content first.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to horoscope service".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Persistent medium errors.
///
/// Never surfaced past `TtlCache`; it logs these and degrades to a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cache medium unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Unknown configuration key '{0}'. Run `astrokit config show` to list keys.")]
    UnknownKey(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_not_found() {
        let err = ApiError::NotFound("horoscope for ophiuchus".to_string());
        assert!(err.to_string().contains("ophiuchus"));
    }

    #[test]
    fn test_api_error_rate_limit() {
        let err = ApiError::RateLimit(Duration::from_secs(30));
        let msg = err.to_string();
        assert!(msg.contains("Rate limit"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_api_error_network() {
        let err = ApiError::Network("Connection refused".to_string());
        assert!(err.to_string().contains("Connection refused"));
    }

    #[test]
    fn test_api_error_invalid_response() {
        let err = ApiError::InvalidResponse("Missing field 'horoscope'".to_string());
        assert!(err.to_string().contains("Missing field"));
    }

    #[test]
    fn test_cache_error_unavailable() {
        let err = CacheError::Unavailable("quota exceeded".to_string());
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_config_error_unknown_key() {
        let err = ConfigError::UnknownKey("theme".to_string());
        let msg = err.to_string();
        assert!(msg.contains("theme"));
        assert!(msg.contains("astrokit config show"));
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::ServerError("boom".to_string()).into();

        match err {
            Error::Api(ApiError::ServerError(msg)) => assert_eq!(msg, "boom"),
            _ => panic!("Expected Error::Api(ApiError::ServerError)"),
        }
    }

    #[test]
    fn test_error_from_cache_error() {
        let err: Error = CacheError::NoHome.into();

        match err {
            Error::Cache(CacheError::NoHome) => (),
            _ => panic!("Expected Error::Cache(CacheError::NoHome)"),
        }
    }

    #[test]
    fn test_invalid_input_message() {
        let err = Error::InvalidInput("date '2025-13-01' is not YYYY-MM-DD".to_string());
        assert!(err.to_string().contains("2025-13-01"));
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
