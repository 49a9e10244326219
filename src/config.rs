//! Engine configuration
//!
//! Loaded from a JSON file; every section is optional and falls back to its
//! defaults.
//!
//! ```json
//! {
//!   "logFilter": "info,theme_editor=debug",
//!   "storage": { "path": "/var/lib/dashboard/themes.db" },
//!   "cache": { "max_entries": 16 },
//!   "remote": { "base_url": "https://stats.example.com", "timeout_secs": 10 },
//!   "alertTtlSecs": 15
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use storage::{CacheConfig, KvConfig};
use theme_client::ClientConfig;
use theme_editor::alerts::DEFAULT_ALERT_TTL_SECS;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Top-level configuration of the theme engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Tracing filter directives, used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Device store
    pub storage: KvConfig,
    /// Keep the device store in memory only
    pub in_memory: bool,
    /// Cache of remote themes
    pub cache: CacheConfig,
    /// Remote theme API; None disables remote reads and writes
    pub remote: Option<ClientConfig>,
    /// Lifetime of save/delete alerts in seconds
    pub alert_ttl_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            storage: KvConfig::default(),
            in_memory: false,
            cache: CacheConfig::default(),
            remote: None,
            alert_ttl_secs: DEFAULT_ALERT_TTL_SECS,
        }
    }
}

impl EngineConfig {
    /// Configuration with an in-memory device store and no remote
    pub fn in_memory() -> Self {
        Self { in_memory: true, ..Default::default() }
    }

    /// Parse configuration JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in config file {}", path.display()))
    }

    /// Builder-style store path
    pub fn with_storage_path(mut self, path: impl Into<String>) -> Self {
        self.storage = KvConfig { path: path.into(), ..self.storage };
        self.in_memory = false;
        self
    }

    /// Builder-style remote
    pub fn with_remote(mut self, remote: ClientConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.alert_ttl_secs > 0, "alertTtlSecs must be positive");
        if let Some(remote) = &self.remote {
            anyhow::ensure!(
                remote.base_url.starts_with("http://") || remote.base_url.starts_with("https://"),
                "remote.base_url must be an http(s) URL, got {:?}",
                remote.base_url
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.log_filter, "info");
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_json_str(
            r#"{
                "logFilter": "debug",
                "storage": { "path": "themes.db" },
                "remote": { "base_url": "https://stats.example.com", "timeout_secs": 5 },
                "alertTtlSecs": 3
            }"#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.storage.path, "themes.db");
        assert!(config.storage.compression);
        let remote = config.remote.unwrap();
        assert_eq!(remote.timeout_secs, 5);
        assert_eq!(remote.retry.max_retries, 2);
        assert_eq!(config.alert_ttl_secs, 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EngineConfig::from_json_str(r#"{"alertTtlSecs": 0}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"remote": {"base_url": "ftp://x"}}"#).is_err());
        assert!(EngineConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"inMemory": true}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(config.in_memory);

        let missing = EngineConfig::load(dir.path().join("missing.json"));
        assert!(missing.unwrap_err().to_string().contains("failed to read config file"));
    }
}
