//! Connector configuration parser.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Advisory default for concurrent requests, matching what a small
/// host-managed pool typically provisions.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: u32 = 2;

/// Errors raised while loading or validating connector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] Box<toml::de::Error>),

    #[error("max_concurrent_requests must be at least 1")]
    InvalidMaxConcurrentRequests,
}

/// Connector settings supplied by the embedding host.
///
/// `max_concurrent_requests` is advisory metadata surfaced to callers
/// through `ConnectionMetadata`; nothing in this workspace enforces it.
/// Enforcement belongs to the external pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Maximum concurrent requests the backing facility supports. Must be
    /// at least 1.
    pub max_concurrent_requests: u32,
    /// Product name reported through connection metadata.
    pub product_name: String,
    /// Product version reported through connection metadata.
    pub product_version: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            product_name: "taskbridge".to_string(),
            product_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ConnectorConfig {
    /// Load and validate configuration from a toml file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a toml string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ConnectorConfig = toml::from_str(content).map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the single constraint this config carries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_requests < 1 {
            return Err(ConfigError::InvalidMaxConcurrentRequests);
        }
        Ok(())
    }
}
