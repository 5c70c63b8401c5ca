//! Configuration system using TOML files.
//!
//! Config is read from the OS-standard config directory unless a path is
//! given on the command line:
//! - Windows: %APPDATA%\music-id\config.toml
//! - macOS: ~/Library/Application Support/music-id/config.toml
//! - Linux: ~/.config/music-id/config.toml
//!
//! Every section is optional; missing values fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::identify::{IdentifyConfig, acoustid, fingerprint};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// AcoustID lookup settings
    pub acoustid: AcoustIdConfig,

    /// fpcalc and temp file settings
    pub fingerprint: FingerprintConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// AcoustID API key for fingerprint lookups
    pub acoustid_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoustIdConfig {
    /// Lookup endpoint
    pub endpoint: String,

    /// Maximum lookups per second (AcoustID allows 3)
    pub requests_per_second: f64,
}

impl Default for AcoustIdConfig {
    fn default() -> Self {
        Self {
            endpoint: acoustid::DEFAULT_ENDPOINT.to_string(),
            requests_per_second: 3.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Explicit fpcalc binary (probed from common install paths when unset)
    pub fpcalc_path: Option<PathBuf>,

    /// Staging directory for uploads and downloads (OS temp dir when unset)
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Check values that would otherwise fail later at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.acoustid.requests_per_second;
        if !rate.is_finite() || rate <= 0.0 || Duration::try_from_secs_f64(1.0 / rate).is_err() {
            return Err(ConfigError::Invalid(format!(
                "acoustid.requests_per_second must be a positive, representable rate, got {rate}"
            )));
        }
        if self.acoustid.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("acoustid.endpoint is empty".to_string()));
        }
        Ok(())
    }

    /// The configured API key, if non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.credentials
            .acoustid_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    /// Build the identification service config.
    ///
    /// Fails when no API key is configured; lookups are useless without one.
    /// An unset fpcalc path is resolved here by probing the usual install
    /// locations, which blocks, so call this outside the async runtime.
    pub fn identify_config(&self) -> Result<IdentifyConfig, ConfigError> {
        let api_key = self.api_key().ok_or(ConfigError::MissingApiKey)?;

        Ok(IdentifyConfig {
            acoustid_api_key: api_key.to_string(),
            acoustid_endpoint: self.acoustid.endpoint.clone(),
            requests_per_second: self.acoustid.requests_per_second,
            fpcalc_path: self
                .fingerprint
                .fpcalc_path
                .clone()
                .or_else(fingerprint::find_fpcalc),
            temp_dir: self
                .fingerprint
                .temp_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        })
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-id"))
}

/// Get the full path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("AcoustID API key not set (use --api-key, ACOUSTID_API_KEY, or [credentials] in the config file)")]
    MissingApiKey,
}

// ============================================================================
// Tests
// ============================================================================
