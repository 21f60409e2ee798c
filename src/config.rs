// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the embed guard.
//!
//! Loaded once at startup from an optional JSON file (`CONFIG_FILE`) and
//! environment overrides, then treated as immutable.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// URL and text validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Upload metadata limits
    #[serde(default)]
    pub upload: UploadConfig,

    /// Embed URL configuration
    #[serde(default)]
    pub embed: EmbedConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding-window rate limit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum accepted requests per identifier per window (default: 10)
    #[serde(default = "default_max_requests")]
    pub max_requests_per_window: u32,

    /// Window length in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// How often the service purges empty histories, in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,

    /// Key the HTTP limiter on the body `identifier` instead of the peer
    /// address. Only safe behind a trusted proxy (default: false)
    #[serde(default)]
    pub trust_client_identifier: bool,
}

/// Submission validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Host names (and their subdomains) accepted as video sources
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,

    /// Protocols that are always rejected, with trailing colon
    #[serde(default = "default_blocked_protocols")]
    pub blocked_protocols: Vec<String>,

    /// Maximum URL length in characters (default: 2048)
    #[serde(default = "default_max_url_length")]
    pub max_url_length: usize,

    /// Maximum raw input length in characters (default: 4096)
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,
}

/// Upload metadata validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum declared file size in bytes (default: 100 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Accepted MIME types; empty accepts any
    #[serde(default = "default_mime_types")]
    pub allowed_mime_types: Vec<String>,

    /// Accepted file extensions without the dot; empty accepts any
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,
}

/// Embed URL configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Origin of the embedding application, pinned into every embed URL
    #[serde(default = "default_origin")]
    pub origin: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_allowed_domains() -> Vec<String> {
    vec![
        "youtube.com".to_string(),
        "youtu.be".to_string(),
        "youtube-nocookie.com".to_string(),
    ]
}

fn default_blocked_protocols() -> Vec<String> {
    vec![
        "javascript:".to_string(),
        "data:".to_string(),
        "vbscript:".to_string(),
        "file:".to_string(),
    ]
}

fn default_max_url_length() -> usize {
    2048
}

fn default_max_input_length() -> usize {
    4096
}

fn default_max_file_size() -> u64 {
    100 * 1024 * 1024
}

fn default_mime_types() -> Vec<String> {
    ["video/mp4", "video/webm", "video/ogg", "video/quicktime"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_extensions() -> Vec<String> {
    ["mp4", "webm", "ogg", "ogv", "mov"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            upload: UploadConfig::default(),
            embed: EmbedConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: default_max_requests(),
            window_ms: default_window_ms(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            trust_client_identifier: false,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allowed_domains: default_allowed_domains(),
            blocked_protocols: default_blocked_protocols(),
            max_url_length: default_max_url_length(),
            max_input_length: default_max_input_length(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            allowed_mime_types: default_mime_types(),
            allowed_extensions: default_extensions(),
        }
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the sliding window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Get the cleanup interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl Config {
    /// Load configuration: optional `CONFIG_FILE`, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file. Missing sections take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply environment variable overrides on top of the current values.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(v) = env_parse("RATE_LIMIT_MAX_REQUESTS")? {
            self.rate_limit.max_requests_per_window = v;
        }
        if let Some(v) = env_parse("RATE_LIMIT_WINDOW_MS")? {
            self.rate_limit.window_ms = v;
        }
        if let Some(v) = env_parse("RATE_LIMIT_TRUST_CLIENT_IDENTIFIER")? {
            self.rate_limit.trust_client_identifier = v;
        }
        if let Some(v) = env_parse("MAX_URL_LENGTH")? {
            self.validation.max_url_length = v;
        }
        if let Some(v) = env_parse("MAX_INPUT_LENGTH")? {
            self.validation.max_input_length = v;
        }
        if let Some(v) = env_parse("MAX_FILE_SIZE_BYTES")? {
            self.upload.max_file_size_bytes = v;
        }
        if let Ok(domains) = std::env::var("ALLOWED_DOMAINS") {
            self.validation.allowed_domains = split_list(&domains);
        }
        if let Ok(origin) = std::env::var("EMBED_ORIGIN") {
            self.embed.origin = origin;
        }
        Ok(())
    }

    /// Reject configurations the engine cannot operate under.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.max_requests_per_window == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.max_requests_per_window must be > 0".into(),
            ));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(ConfigError::Invalid("rate_limit.window_ms must be > 0".into()));
        }
        if self.rate_limit.cleanup_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "rate_limit.cleanup_interval_secs must be > 0".into(),
            ));
        }
        if self.validation.max_url_length == 0 || self.validation.max_input_length == 0 {
            return Err(ConfigError::Invalid("length limits must be > 0".into()));
        }
        if self.validation.allowed_domains.is_empty() {
            return Err(ConfigError::Invalid(
                "validation.allowed_domains must not be empty".into(),
            ));
        }
        match Url::parse(&self.embed.origin) {
            Ok(origin) if matches!(origin.scheme(), "http" | "https") && origin.has_host() => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "embed.origin is not an http(s) origin: {}",
                    self.embed.origin
                )))
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
        Err(_) => Ok(None),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
