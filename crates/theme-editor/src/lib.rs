//! Theme editing for the analytics dashboard
//!
//! This crate turns stored themes into editable sessions: user changes are
//! recorded as [`edit::EditOperation`]s in an undo/redo
//! [`history::EditHistory`], replayed on every read, validated, and flushed
//! through the local-first [`theme_storage::ThemeStorage`] facade on save.
//!
//! # Modules
//!
//! - [`edit`] - Edit operations and theme projections
//! - [`history`] - Undo/redo stacks with batch discard
//! - [`session`] - Edit session (validation, rename, save, stylesheet)
//! - [`theme_storage`] - Local-first storage facade over theme repositories
//! - [`alerts`] - Dismissible, auto-expiring alerts
//! - [`permissions`] - Caller permissions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alerts;
pub mod edit;
pub mod error;
pub mod history;
pub mod permissions;
pub mod session;
pub mod theme_storage;

#[cfg(test)]
mod test_utils;

pub use alerts::{Alert, AlertCenter, AlertLevel};
pub use edit::{replay, EditOperation, EditTarget, ThemeProjection};
pub use error::{EditorError, Result};
pub use history::{EditHistory, EditState, HistoryEntry};
pub use permissions::{Permissions, MANAGE_THEMES};
pub use session::ThemeEditSession;
pub use theme_storage::{RemoteSaveStatus, SaveOutcome, ThemeStorage};
