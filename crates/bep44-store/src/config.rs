use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`Wrapper`](crate::Wrapper).
///
/// Loadable from TOML; missing fields take their defaults:
///
/// ```toml
/// expiry_secs = 7200
/// lock_stripes = 64
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// How long an item stays readable after its last accepted put.
    pub expiry_secs: u64,
    /// Number of mutexes puts for different targets are spread across.
    /// Puts for one target always share a stripe.
    pub lock_stripes: usize,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            expiry_secs: 2 * 60 * 60,
            lock_stripes: 64,
        }
    }
}

impl WrapperConfig {
    /// Default configuration with a different expiry.
    pub fn with_expiry(expiry: Duration) -> Self {
        Self {
            expiry_secs: expiry.as_secs(),
            ..Default::default()
        }
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }

    /// Reject settings the wrapper cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lock_stripes == 0 {
            return Err(ConfigError::Invalid("lock_stripes must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Errors from loading a [`WrapperConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
