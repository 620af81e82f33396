//! Configuration management for astrokit

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::horoscope::ZodiacSign;
use crate::lunar::Coordinates;

/// Output formats accepted in `preferences.format`
const FORMATS: [&str; 3] = ["pretty", "table", "json"];

/// Keys accepted by `config set`
pub const KEYS: [&str; 5] = [
    "api_host",
    "default_sign",
    "location",
    "preferences.format",
    "preferences.events_days",
];

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Horoscope service host override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Sign used by `horoscope` when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sign: Option<ZodiacSign>,

    /// Observer position used by `moon` when no coordinates are given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Default look-ahead for `events`
    #[serde(default = "default_events_days")]
    pub events_days: u32,
}

fn default_events_days() -> u32 {
    30
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            events_days: default_events_days(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".astrokit").join("config.yaml"))
    }

    /// Explicit path if given, the default location otherwise
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_or_default(&Self::resolve_path(path)?)
    }

    fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load_from(path) {
            Err(crate::error::Error::Config(ConfigError::NotFound(_))) => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Set one key from its string form, validating the value
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_host" => {
                let host = value.trim().trim_end_matches('/');
                if !(host.starts_with("http://") || host.starts_with("https://")) {
                    return Err(ConfigError::Invalid(format!(
                        "api_host must start with http:// or https://, got '{}'",
                        value
                    ))
                    .into());
                }
                self.api_host = Some(host.to_string());
            }
            "default_sign" => {
                self.default_sign = Some(value.parse()?);
            }
            "location" => {
                let (lat, lon) = value.split_once(',').ok_or_else(|| {
                    ConfigError::Invalid(format!("location must be 'LAT,LON', got '{}'", value))
                })?;
                let lat = parse_coordinate(lat)?;
                let lon = parse_coordinate(lon)?;
                self.location = Some(Coordinates::new(lat, lon)?);
            }
            "preferences.format" => {
                let format = value.trim().to_lowercase();
                if !FORMATS.contains(&format.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "format must be one of {}, got '{}'",
                        FORMATS.join(", "),
                        value
                    ))
                    .into());
                }
                self.preferences.format = Some(format);
            }
            "preferences.events_days" => {
                let days = value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|d| (1..=366).contains(d))
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!(
                            "events_days must be between 1 and 366, got '{}'",
                            value
                        ))
                    })?;
                self.preferences.events_days = days;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string()).into()),
        }
        Ok(())
    }
}

fn parse_coordinate(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::Invalid(format!("'{}' is not a number", value.trim())).into())
}

type Listener = Box<dyn Fn(&Config) + Send + Sync>;

/// Loaded configuration plus where it lives.
///
/// Changes go through `update`, which persists them and then tells every
/// subscriber about the new values.
pub struct Settings {
    config: Config,
    path: PathBuf,
    listeners: Vec<Listener>,
}

impl Settings {
    /// Load settings from `path` (or the default location)
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = Config::load_at(path)?;
        Ok(Self::new(config, Config::resolve_path(path)?))
    }

    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            config,
            path,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a callback run after every successful update
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&Config) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Apply `change`, save, then notify subscribers.
    ///
    /// Nothing is saved or notified if `change` or the save fails; the
    /// in-memory config is left as it was.
    pub fn update<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Config) -> Result<()>,
    {
        let mut next = self.config.clone();
        change(&mut next)?;
        next.save_to(&self.path)?;
        self.config = next;

        for listener in &self.listeners {
            listener(&self.config);
        }
        Ok(())
    }
}
