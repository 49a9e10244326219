//! Caller permissions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Permission required to save or delete themes on the remote store
pub const MANAGE_THEMES: &str = "manage.themes";

/// Set of permissions held by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeSet<String>);

impl Permissions {
    /// No permissions
    pub fn none() -> Self {
        Self::default()
    }

    /// Permissions of a theme manager
    pub fn theme_manager() -> Self {
        Self::none().grant(MANAGE_THEMES)
    }

    /// Builder-style grant
    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.0.insert(permission.into());
        self
    }

    /// Whether the permission is held
    pub fn has(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }

    /// Whether remote theme writes are allowed
    pub fn can_manage_themes(&self) -> bool {
        self.has(MANAGE_THEMES)
    }
}

impl<S: Into<String>> FromIterator<S> for Permissions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
