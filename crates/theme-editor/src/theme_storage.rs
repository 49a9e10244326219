//! Theme storage facade
//!
//! Combines the device store, an optional remote store and an in-memory
//! cache of remote themes behind one local-first API.
//!
//! Reads try, in order: the local store, the cache, the remote store, and
//! finally the built-in theme. Saves always go to the local store first; the
//! remote store is written only when the caller may manage themes. A remote
//! failure after a successful local save is reported as an alert, not as an
//! error.

use crate::alerts::{AlertCenter, AlertLevel};
use crate::error::{EditorError, Result};
use crate::permissions::{Permissions, MANAGE_THEMES};
use std::collections::BTreeSet;
use std::sync::Arc;
use storage::{CacheConfig, MemoryCache, SaveThemeRequest, StorageError, ThemeRepository};
use theme_core::theme::{default_theme, Theme, DEFAULT_THEME_NAME};

/// What happened on the remote side of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSaveStatus {
    /// Remote store accepted the theme
    Saved,
    /// No remote store is configured
    NotConfigured,
    /// Caller lacks `manage.themes`
    NotPermitted,
    /// Remote store failed; the local copy was kept
    Failed(String),
}

/// Result of a save through the facade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Name the theme was saved under
    pub theme: String,
    /// Remote side of the save
    pub remote: RemoteSaveStatus,
}

/// Local-first theme storage
pub struct ThemeStorage {
    local: Arc<dyn ThemeRepository>,
    remote: Option<Arc<dyn ThemeRepository>>,
    cache: MemoryCache<Theme>,
    alerts: Arc<AlertCenter>,
}

impl ThemeStorage {
    /// Create a facade over a local repository
    pub fn new(local: Arc<dyn ThemeRepository>, cache: CacheConfig) -> Self {
        Self {
            local,
            remote: None,
            cache: MemoryCache::new(cache),
            alerts: Arc::new(AlertCenter::default()),
        }
    }

    /// Add a remote repository
    pub fn with_remote(mut self, remote: Arc<dyn ThemeRepository>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Share an alert center
    pub fn with_alerts(mut self, alerts: Arc<AlertCenter>) -> Self {
        self.alerts = alerts;
        self
    }

    /// Alert center receiving save and delete failures
    pub fn alerts(&self) -> &Arc<AlertCenter> {
        &self.alerts
    }

    /// Whether a remote store is configured
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Load a theme
    pub async fn get(&self, name: &str) -> Result<Theme> {
        let mut corrupted = None;
        match self.local.get(name).await {
            Ok(Some(theme)) => return Ok(theme),
            Ok(None) => {}
            Err(e @ StorageError::Corrupted { .. }) => corrupted = Some(e),
            Err(e) => return Err(e.into()),
        }

        if let Some(theme) = self.cache.get(name) {
            tracing::debug!(theme = name, "theme cache hit");
            return Ok(theme);
        }

        let mut remote_error = None;
        if let Some(remote) = &self.remote {
            match remote.get(name).await {
                Ok(Some(theme)) => {
                    tracing::info!(theme = name, "loaded theme from remote store");
                    self.cache.put(name, theme.clone(), None);
                    return Ok(theme);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(theme = name, error = %e, "remote theme fetch failed");
                    remote_error = Some(e);
                }
            }
        }

        if name == DEFAULT_THEME_NAME {
            return Ok(default_theme());
        }
        match corrupted.or(remote_error) {
            Some(e) => Err(e.into()),
            None => Err(EditorError::NotFound(name.to_string())),
        }
    }

    /// Save a theme locally, then remotely when permitted
    pub async fn save(
        &self,
        request: &SaveThemeRequest,
        permissions: &Permissions,
    ) -> Result<SaveOutcome> {
        let name = request.theme.name.clone();
        self.local.save(request).await?;

        self.cache.remove(&name);
        if let Some(previous) = &request.previous_name {
            self.cache.remove(previous);
        }

        let remote = match &self.remote {
            None => RemoteSaveStatus::NotConfigured,
            Some(_) if !permissions.can_manage_themes() => RemoteSaveStatus::NotPermitted,
            Some(remote) => match remote.save(request).await {
                Ok(()) => {
                    self.cache.put(name.clone(), request.theme.clone(), None);
                    RemoteSaveStatus::Saved
                }
                Err(e) => {
                    tracing::warn!(theme = %name, error = %e, "remote save failed, kept local copy");
                    self.alerts.push(
                        AlertLevel::Error,
                        format!("Theme {name} was saved on this device, but the server save failed: {e}"),
                        Some(&name),
                    );
                    RemoteSaveStatus::Failed(e.to_string())
                }
            },
        };

        Ok(SaveOutcome { theme: name, remote })
    }

    /// Delete a theme locally, and remotely when permitted
    ///
    /// Returns whether any store held the theme.
    pub async fn delete(&self, name: &str, permissions: &Permissions) -> Result<bool> {
        let local = self.local.delete(name).await?;
        self.cache.remove(name);

        let Some(remote) = &self.remote else {
            return Ok(local);
        };
        if !permissions.can_manage_themes() {
            if local {
                return Ok(true);
            }
            return Err(EditorError::PermissionDenied(MANAGE_THEMES.to_string()));
        }

        match remote.delete(name).await {
            Ok(removed) => Ok(local || removed),
            Err(e) => {
                tracing::warn!(theme = name, error = %e, "remote delete failed");
                self.alerts.push(
                    AlertLevel::Error,
                    format!("Could not delete theme {name} from the server: {e}"),
                    Some(name),
                );
                Ok(local)
            }
        }
    }

    /// Names of themes stored on this device
    pub async fn list_local(&self) -> Result<Vec<String>> {
        Ok(self.local.list().await?)
    }

    /// Names from every store plus the built-in theme, sorted
    pub async fn list_all(&self) -> Result<Vec<String>> {
        let mut names: BTreeSet<String> = self.local.list().await?.into_iter().collect();
        if let Some(remote) = &self.remote {
            match remote.list().await {
                Ok(remote_names) => names.extend(remote_names),
                Err(e) => tracing::warn!(error = %e, "remote theme list failed"),
            }
        }
        names.insert(DEFAULT_THEME_NAME.to_string());
        Ok(names.into_iter().collect())
    }

    /// Copy an existing theme under a new name on this device
    pub async fn clone_theme(&self, source: &str, new_name: &str) -> Result<Theme> {
        if self.local.get(new_name).await?.is_some() {
            return Err(EditorError::AlreadyExists(new_name.to_string()));
        }

        let theme = self.get(source).await?.clone_as(new_name)?;
        self.local.save(&SaveThemeRequest::new(theme.clone())).await?;
        tracing::info!(source, theme = new_name, "cloned theme");
        Ok(theme)
    }

    /// Store an uploaded theme JSON document on this device
    pub async fn import_json(&self, json: &str) -> Result<Theme> {
        let theme = Theme::from_json_str(json)?;
        theme.check_colors()?;
        self.local.save(&SaveThemeRequest::new(theme.clone())).await?;
        tracing::info!(theme = %theme.name, "imported theme");
        Ok(theme)
    }
}
