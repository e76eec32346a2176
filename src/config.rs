//! Migration configuration.
//!
//! Everything has a default, so a config file is optional. When one is passed
//! with `--config`, it only needs the values it overrides:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnails]
//! size = [512, 384]         # Bounding box (width, height) for generated thumbnails
//!
//! [http]
//! timeout_secs = 30         # Per-request timeout (omit for the client default)
//! user_agent = "blogger-to-hugo/1.0.1"
//! ```
//!
//! A `--thumbnail-size WIDTHxHEIGHT` flag on the command line wins over
//! `thumbnails.size`.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ThumbnailSize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for one migration run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    /// Thumbnail generation settings.
    pub thumbnails: ThumbnailsConfig,
    /// Image download settings.
    pub http: HttpConfig,
}

impl MigrateConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.size[0] == 0 || self.thumbnails.size[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.size values must be non-zero".into(),
            ));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "http.user_agent must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn thumbnail_size(&self) -> ThumbnailSize {
        ThumbnailSize {
            width: self.thumbnails.size[0],
            height: self.thumbnails.size[1],
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Bounding box as `[width, height]`. Thumbnails keep the source aspect ratio.
    pub size: [u32; 2],
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        let default = ThumbnailSize::default();
        Self {
            size: [default.width, default.height],
        }
    }
}

/// Image download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout. `None` keeps the HTTP client's own default.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<MigrateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: MigrateConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `path` when given, otherwise fall back to the stock defaults.
pub fn load_optional_config(path: Option<&Path>) -> Result<MigrateConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(MigrateConfig::default()),
    }
}
