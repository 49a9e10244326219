//! Theme repositories
//!
//! [`ThemeRepository`] is the single interface through which themes are
//! loaded, saved and deleted. Backends (device store, remote REST store)
//! implement it and are injected where needed as `Arc<dyn ThemeRepository>`.

use crate::kv::{self, KvError, KvStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use theme_core::theme::{validate_theme_name, Theme, ThemeError};
use thiserror::Error;

/// Key of the list of locally stored theme names
pub const REGISTRY_KEY: &str = "themes:registry";

/// Scope of per-theme blobs (`themes:theme:<name>`)
pub const THEME_SCOPE: [&str; 2] = ["themes", "theme"];

/// Repository error types
#[derive(Debug, Error)]
pub enum StorageError {
    /// No theme with that name
    #[error("Theme not found: {0}")]
    NotFound(String),

    /// A stored entry could not be parsed
    #[error("Stored theme {name} is corrupted: {reason}")]
    Corrupted {
        /// Entry name
        name: String,
        /// Parse failure
        reason: String,
    },

    /// Theme failed validation
    #[error("Invalid theme: {0}")]
    InvalidTheme(#[from] ThemeError),

    /// Device store failure
    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),

    /// Remote store rejected or failed the request
    #[error("Remote store error: {message}")]
    Remote {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Caller lacks the permission the operation needs
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Theme to save plus the name it was stored under before a rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveThemeRequest {
    /// Theme to store
    pub theme: Theme,
    /// Previous name when the theme was renamed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_name: Option<String>,
}

impl SaveThemeRequest {
    /// Save without rename
    pub fn new(theme: Theme) -> Self {
        Self { theme, previous_name: None }
    }

    /// Save and move the entry stored under `previous_name`
    pub fn renamed_from(theme: Theme, previous_name: impl Into<String>) -> Self {
        let previous_name = Some(previous_name.into()).filter(|p| *p != theme.name);
        Self { theme, previous_name }
    }
}

/// Storage backend for themes
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Load a theme by name
    async fn get(&self, name: &str) -> Result<Option<Theme>>;

    /// Store a theme, removing the previous entry on rename
    async fn save(&self, request: &SaveThemeRequest) -> Result<()>;

    /// Delete a theme; returns whether it existed
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Names of stored themes
    async fn list(&self) -> Result<Vec<String>>;
}

// =============================================================================
// Local Repository
// =============================================================================

/// Themes stored in the device key-value store
#[derive(Clone)]
pub struct LocalThemeRepository {
    kv: Arc<KvStore>,
}

impl LocalThemeRepository {
    /// Create a repository over a key-value store
    pub fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    fn theme_key(name: &str) -> Result<String> {
        Ok(kv::key(&[THEME_SCOPE[0], THEME_SCOPE[1], name])?)
    }

    fn registry(&self) -> Result<Vec<String>> {
        match self.kv.read::<Vec<String>>(REGISTRY_KEY) {
            Ok(names) => Ok(names.unwrap_or_default()),
            Err(KvError::Decode { source, .. }) => {
                tracing::warn!(error = %source, "theme registry is corrupted");
                Err(StorageError::Corrupted {
                    name: REGISTRY_KEY.to_string(),
                    reason: source.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_registry(&self, names: &[String]) -> Result<()> {
        self.kv.write(REGISTRY_KEY, names)?;
        Ok(())
    }

    /// Whether a theme is registered locally
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.registry()?.iter().any(|n| n == name))
    }

    /// Store raw JSON under a theme name without parsing it
    pub fn import_raw(&self, name: &str, json: &str) -> Result<()> {
        validate_theme_name(name)?;
        self.kv.write_bytes(&Self::theme_key(name)?, json.as_bytes())?;
        let mut names = self.registry()?;
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
            self.write_registry(&names)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ThemeRepository for LocalThemeRepository {
    async fn get(&self, name: &str) -> Result<Option<Theme>> {
        match self.kv.read::<Theme>(&Self::theme_key(name)?) {
            Ok(theme) => Ok(theme),
            Err(KvError::Decode { source, .. }) => {
                tracing::warn!(theme = name, error = %source, "stored theme is corrupted");
                Err(StorageError::Corrupted { name: name.to_string(), reason: source.to_string() })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, request: &SaveThemeRequest) -> Result<()> {
        let name = request.theme.name.as_str();
        validate_theme_name(name)?;

        self.kv.write(&Self::theme_key(name)?, &request.theme)?;

        let mut names = self.registry()?;
        if let Some(previous) = request.previous_name.as_deref().filter(|p| *p != name) {
            self.kv.remove(&Self::theme_key(previous)?)?;
            names.retain(|n| n != previous);
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        self.write_registry(&names)?;

        tracing::info!(theme = name, previous = ?request.previous_name, "saved theme locally");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let removed = self.kv.remove(&Self::theme_key(name)?)?;
        let mut names = self.registry()?;
        let before = names.len();
        names.retain(|n| n != name);
        let unregistered = names.len() != before;
        if unregistered {
            self.write_registry(&names)?;
        }

        if removed || unregistered {
            tracing::info!(theme = name, "deleted local theme");
        }
        Ok(removed || unregistered)
    }

    async fn list(&self) -> Result<Vec<String>> {
        self.registry()
    }
}
