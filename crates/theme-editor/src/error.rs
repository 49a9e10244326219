//! Editor error types

use storage::StorageError;
use theme_core::theme::ThemeError;
use thiserror::Error;

/// Theme editing errors
#[derive(Debug, Error)]
pub enum EditorError {
    /// Repository failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Invalid theme data
    #[error(transparent)]
    Theme(#[from] ThemeError),

    /// Theme not found in any store
    #[error("Theme not found: {0}")]
    NotFound(String),

    /// A theme with that name already exists
    #[error("Theme already exists: {0}")]
    AlreadyExists(String),

    /// Save refused because the theme has unresolved references
    #[error("Theme has {} unresolved reference(s)", .0.len())]
    ValidationFailed(Vec<String>),

    /// Caller lacks a required permission
    #[error("Permission denied: {0} required")]
    PermissionDenied(String),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
