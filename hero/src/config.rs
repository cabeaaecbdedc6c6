//! Configuration for the hero carousel.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::overlay::DEFAULT_HERO_IMAGE;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Image shown in the fallback slot when nothing else is configured
pub const DEFAULT_FALLBACK_MEDIA_URL: &str = "https://cdn.builder.io/api/v1/image/assets%2Fa70a28525f6f491aaa751610252a199c%2F67c8b636de774dd2bb5d7097f5fcc176?format=webp&width=800";

/// Default phase length in milliseconds
pub const DEFAULT_PHASE_MS: u64 = 2_000;

/// Rotation period in milliseconds
pub const DEFAULT_ROTATION_PERIOD_MS: u64 = 15_000;

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Raw value found
        value: String,
    },

    /// A timer duration is zero
    #[error("{key} must be greater than zero")]
    ZeroDuration {
        /// Environment variable name
        key: &'static str,
    },
}

/// Hero carousel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroConfig {
    /// How long the default image stays before rotation starts, in milliseconds
    pub default_phase_ms: u64,
    /// Time between two rotation ticks, in milliseconds
    pub rotation_period_ms: u64,
    /// Image shown during the default phase
    pub default_image: String,
    /// Image of the trailing fallback slot
    pub fallback_media_url: String,
    /// Optional catalog JSON file feeding the demo
    pub events_file: Option<PathBuf>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            default_phase_ms: DEFAULT_PHASE_MS,
            rotation_period_ms: DEFAULT_ROTATION_PERIOD_MS,
            default_image: DEFAULT_HERO_IMAGE.to_string(),
            fallback_media_url: DEFAULT_FALLBACK_MEDIA_URL.to_string(),
            events_file: None,
        }
    }
}

impl HeroConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset, unparsable or zero values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from environment variables, rejecting bad values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a duration is unparsable or zero.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::try_from_lookup(|key| env::var(key).ok())
    }

    /// Lenient loading from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            default_phase_ms: lookup("HERO_DEFAULT_PHASE_MS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.default_phase_ms),
            rotation_period_ms: lookup("HERO_ROTATION_PERIOD_MS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.rotation_period_ms),
            default_image: lookup("HERO_DEFAULT_IMAGE").unwrap_or(defaults.default_image),
            fallback_media_url: lookup("HERO_FALLBACK_MEDIA_URL")
                .unwrap_or(defaults.fallback_media_url),
            events_file: lookup("HERO_EVENTS_FILE").map(PathBuf::from),
        }
    }

    /// Strict loading from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a duration is unparsable or zero.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_lookup(&lookup);
        config.default_phase_ms = strict_millis(&lookup, "HERO_DEFAULT_PHASE_MS", DEFAULT_PHASE_MS)?;
        config.rotation_period_ms =
            strict_millis(&lookup, "HERO_ROTATION_PERIOD_MS", DEFAULT_ROTATION_PERIOD_MS)?;
        Ok(config)
    }

    /// Set the default phase length
    #[must_use]
    pub fn with_default_phase(mut self, duration: Duration) -> Self {
        self.default_phase_ms = millis(duration);
        self
    }

    /// Set the rotation period
    #[must_use]
    pub fn with_rotation_period(mut self, period: Duration) -> Self {
        self.rotation_period_ms = millis(period);
        self
    }

    /// Set the default phase image
    #[must_use]
    pub fn with_default_image(mut self, url: impl Into<String>) -> Self {
        self.default_image = url.into();
        self
    }

    /// Set the fallback slot image
    #[must_use]
    pub fn with_fallback_media_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_media_url = url.into();
        self
    }

    /// Set the catalog file
    #[must_use]
    pub fn with_events_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.events_file = Some(path.into());
        self
    }

    /// Default phase length
    #[must_use]
    pub const fn default_phase(&self) -> Duration {
        Duration::from_millis(self.default_phase_ms)
    }

    /// Rotation period
    #[must_use]
    pub const fn rotation_period(&self) -> Duration {
        Duration::from_millis(self.rotation_period_ms)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn strict_millis<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.clone(),
    })?;

    if ms == 0 {
        return Err(ConfigError::ZeroDuration { key });
    }
    Ok(ms)
}
