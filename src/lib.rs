//! Dashboard Theme Engine
//!
//! Wires the theme crates into one entry point: a device store, an optional
//! remote theme API, the local-first storage facade and the alert list.
//!
//! # Crates
//!
//! - `theme-core` - Theme model, colors, use-case merging, stylesheet generation
//! - `storage` - Device key-value store, theme repositories, memory cache
//! - `theme-client` - REST client for the remote theme API
//! - `theme-editor` - Edit history, edit sessions, storage facade, alerts
//!
//! # Example
//!
//! ```rust
//! use dashboard_theme::{EngineConfig, ThemeEngine};
//! use theme_core::StylesheetScope;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = ThemeEngine::new(EngineConfig::in_memory())?;
//! let css = engine.stylesheet("default", None, &StylesheetScope::Site).await?;
//! assert!(css.starts_with(":root {"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod logging;

pub use config::EngineConfig;
pub use logging::init_logging;

use anyhow::{Context, Result};
use std::sync::Arc;
use storage::{KvStore, LocalThemeRepository};
use theme_client::{RemoteThemeRepository, RestClient};
use theme_core::stylesheet::{generate, StylesheetScope};
use theme_editor::{AlertCenter, Permissions, ThemeEditSession, ThemeStorage};

/// Assembled theme engine
pub struct ThemeEngine {
    config: EngineConfig,
    kv: Arc<KvStore>,
    storage: Arc<ThemeStorage>,
}

impl ThemeEngine {
    /// Open the device store and connect the configured remote
    pub fn new(config: EngineConfig) -> Result<Self> {
        let kv = if config.in_memory {
            KvStore::in_memory().context("failed to open in-memory theme store")?
        } else {
            KvStore::open(&config.storage)
                .with_context(|| format!("failed to open theme store at {}", config.storage.path))?
        };
        let kv = Arc::new(kv);

        let alerts = Arc::new(AlertCenter::with_ttl_secs(config.alert_ttl_secs));
        let mut storage =
            ThemeStorage::new(Arc::new(LocalThemeRepository::new(kv.clone())), config.cache.clone())
                .with_alerts(alerts);

        if let Some(remote) = &config.remote {
            let client = RestClient::new(remote.clone()).context("failed to build theme API client")?;
            storage = storage.with_remote(Arc::new(RemoteThemeRepository::new(client)));
            tracing::info!(base_url = %remote.base_url, "remote theme store configured");
        }

        tracing::info!(in_memory = config.in_memory, "theme engine ready");
        Ok(Self { config, kv, storage: Arc::new(storage) })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Storage facade shared by all sessions
    pub fn storage(&self) -> &Arc<ThemeStorage> {
        &self.storage
    }

    /// Alerts raised by saves and deletes
    pub fn alerts(&self) -> &Arc<AlertCenter> {
        self.storage.alerts()
    }

    /// Start editing a theme
    pub async fn open_session(
        &self,
        name: &str,
        permissions: Permissions,
    ) -> Result<ThemeEditSession> {
        ThemeEditSession::open(self.storage.clone(), name, permissions)
            .await
            .with_context(|| format!("failed to open theme {name}"))
    }

    /// Stylesheet of a stored theme
    pub async fn stylesheet(
        &self,
        name: &str,
        accent: Option<&str>,
        scope: &StylesheetScope,
    ) -> Result<String> {
        let theme = self
            .storage
            .get(name)
            .await
            .with_context(|| format!("failed to load theme {name}"))?;
        Ok(generate(&theme, accent, scope))
    }

    /// Every known theme name, sorted
    pub async fn list_themes(&self) -> Result<Vec<String>> {
        Ok(self.storage.list_all().await?)
    }

    /// Write pending device store changes to disk
    pub fn flush(&self) -> Result<()> {
        self.kv.flush().context("failed to flush theme store")
    }
}
