//! Board construction settings.
//!
//! Defaults → JSON file → `VAAMAN_*` environment overrides.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoardError, Result};
use crate::platform::DEFAULT_MODEL_PATH;

/// Environment variable overriding [`Config::model_path`].
pub const ENV_MODEL_PATH: &str = "VAAMAN_MODEL_PATH";

/// Environment variable overriding [`Config::i2c_policy`].
pub const ENV_I2C_POLICY: &str = "VAAMAN_I2C_POLICY";

/// When to register the three I2C buses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum I2cPolicy {
    /// Only when the platform name equals the generic Vaaman name, which no
    /// detected variant reports. I2C buses therefore stay unregistered.
    #[default]
    Legacy,
    /// Always register the I2C buses.
    Always,
}

impl FromStr for I2cPolicy {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "always" => Ok(Self::Always),
            other => Err(BoardError::Config(format!(
                "Unknown I2C policy '{}', expected 'legacy' or 'always'",
                other
            ))),
        }
    }
}

/// Settings consumed by [`crate::board::build_board`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File holding the platform model string.
    pub model_path: PathBuf,
    pub i2c_policy: I2cPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            i2c_policy: I2cPolicy::Legacy,
        }
    }
}

impl Config {
    /// Default config directory (`~/.config/vaaman`).
    pub fn dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vaaman")
    }

    /// Default config file path.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load from `path`, then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)?;
            debug!(path = %path.display(), "Loaded config file");
            config
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `VAAMAN_*` overrides using `lookup` to read variables.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_MODEL_PATH).filter(|v| !v.is_empty()) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup(ENV_I2C_POLICY).filter(|v| !v.is_empty()) {
            self.i2c_policy = policy.parse()?;
        }
        Ok(())
    }
}
