//! Theme edit session
//!
//! A session owns the stored version of one theme (the baseline) and the
//! edit history on top of it. Every read replays the pending edits over the
//! baseline; a successful save makes the saved theme the new baseline and
//! clears both stacks.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use storage::{CacheConfig, KvStore, LocalThemeRepository};
//! use theme_editor::{EditOperation, Permissions, ThemeEditSession, ThemeStorage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kv = Arc::new(KvStore::in_memory()?);
//! let storage = Arc::new(ThemeStorage::new(
//!     Arc::new(LocalThemeRepository::new(kv)),
//!     CacheConfig::default(),
//! ));
//!
//! let mut session = ThemeEditSession::open(storage, "default", Permissions::none()).await?;
//! session.apply_edit(EditOperation::SetColor { name: "red".into(), value: "#ff1111".into() });
//! assert!(session.save_possible());
//!
//! session.save().await?;
//! assert!(!session.can_undo());
//! # Ok(())
//! # }
//! ```

use crate::edit::{EditOperation, ThemeProjection};
use crate::error::{EditorError, Result};
use crate::history::{EditHistory, EditState};
use crate::permissions::Permissions;
use crate::theme_storage::{SaveOutcome, ThemeStorage};
use std::sync::Arc;
use storage::SaveThemeRequest;
use theme_core::stylesheet::{generate, StylesheetScope};
use theme_core::theme::{validate_theme_name, Theme};
use theme_core::validation::issue_messages;

/// Editing state for one theme
pub struct ThemeEditSession {
    storage: Arc<ThemeStorage>,
    permissions: Permissions,
    baseline: Theme,
    base_projection: ThemeProjection,
    name: String,
    history: EditHistory,
}

impl ThemeEditSession {
    /// Load a theme through the storage facade and start editing it
    pub async fn open(
        storage: Arc<ThemeStorage>,
        name: &str,
        permissions: Permissions,
    ) -> Result<Self> {
        let theme = storage.get(name).await?;
        Ok(Self::from_theme(storage, theme, permissions))
    }

    /// Start editing an already loaded theme
    pub fn from_theme(storage: Arc<ThemeStorage>, theme: Theme, permissions: Permissions) -> Self {
        Self {
            storage,
            permissions,
            base_projection: ThemeProjection::from(&theme),
            name: theme.name.clone(),
            baseline: theme,
            history: EditHistory::new(),
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Record an edit
    pub fn apply_edit(&mut self, op: EditOperation) {
        self.history.apply_edit(op);
    }

    /// Undo the most recent edit
    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    /// Redo the most recently undone edit or discard
    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Drop every pending edit (restorable with one redo)
    pub fn discard_all(&mut self) -> bool {
        self.history.discard_all()
    }

    /// Whether undo is possible
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is possible
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Description of the edit undo would revert
    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    /// Description of the entry redo would restore
    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }

    /// Clean or dirty
    pub fn state(&self) -> EditState {
        self.history.state()
    }

    /// Edit history
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// Current name (may differ from the stored name after a rename)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Theme as last loaded or saved
    pub fn baseline(&self) -> &Theme {
        &self.baseline
    }

    /// Stored sections with pending edits replayed
    pub fn projection(&self) -> ThemeProjection {
        self.history.project(&self.base_projection)
    }

    /// The theme as it would be saved now
    pub fn current_theme(&self) -> Theme {
        self.projection().into_theme(self.name.clone())
    }

    /// Whether the edited content differs from the stored theme
    pub fn has_changes(&self) -> bool {
        self.projection() != self.base_projection
    }

    /// Rename the theme; takes effect in stores on the next save
    pub fn rename_theme(&mut self, new_name: &str) -> Result<()> {
        validate_theme_name(new_name)?;
        self.name = new_name.to_string();
        Ok(())
    }

    /// Invalid palette entries and unresolved color references of the
    /// current theme
    pub fn issues(&self) -> Vec<String> {
        issue_messages(&self.current_theme())
    }

    /// Whether save is allowed: no issues, or nothing changed
    pub fn save_possible(&self) -> bool {
        !self.has_changes() || self.issues().is_empty()
    }

    /// Stylesheet of the current theme
    pub fn stylesheet(&self, accent: Option<&str>, scope: &StylesheetScope) -> String {
        generate(&self.current_theme(), accent, scope)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save the current theme
    ///
    /// Edits recorded before this call are part of the saved snapshot. On
    /// success the snapshot becomes the new baseline and both stacks are
    /// cleared, even when the remote half of the save failed.
    pub async fn save(&mut self) -> Result<SaveOutcome> {
        let issues = self.issues();
        if self.has_changes() && !issues.is_empty() {
            return Err(EditorError::ValidationFailed(issues));
        }

        let snapshot = self.current_theme();
        let request = if self.baseline.name != snapshot.name {
            SaveThemeRequest::renamed_from(snapshot.clone(), self.baseline.name.clone())
        } else {
            SaveThemeRequest::new(snapshot.clone())
        };

        let outcome = self.storage.save(&request, &self.permissions).await?;

        tracing::info!(theme = %snapshot.name, remote = ?outcome.remote, "theme saved");
        self.base_projection = ThemeProjection::from(&snapshot);
        self.baseline = snapshot;
        self.history.clear();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{local_storage, red_kills, storage_with_remote, MockRepository};
    use crate::theme_storage::RemoteSaveStatus;
    use storage::StorageError;
    use theme_core::use_case::{UseCasePath, UseCaseValue};

    fn session(theme: Theme) -> ThemeEditSession {
        ThemeEditSession::from_theme(Arc::new(local_storage()), theme, Permissions::none())
    }

    // ==========================================================================
    // Editing
    // ==========================================================================

    #[test]
    fn test_projection_replays_edits() {
        let mut session = session(red_kills("t"));
        session.apply_edit(EditOperation::SetColor { name: "red".into(), value: "#aa0000".into() });

        assert_eq!(session.current_theme().colors.get("red").map(String::as_str), Some("#aa0000"));
        assert_eq!(session.baseline().colors.get("red").map(String::as_str), Some("#ff0000"));
        assert_eq!(session.state(), EditState::Dirty);
        assert!(session.has_changes());
    }

    #[test]
    fn test_rename_color_propagates() {
        let mut session = session(red_kills("t"));
        session.apply_edit(EditOperation::RenameColor {
            from: "red".into(),
            to: "crimson".into(),
            value: "#ff0000".into(),
        });

        let theme = session.current_theme();
        assert!(theme.colors.contains_key("crimson"));
        assert_eq!(theme.use_cases.get("kills"), Some(&UseCaseValue::color_ref("crimson")));
        assert!(session.issues().is_empty());
    }

    #[test]
    fn test_delete_color_reports_issue_and_blocks_save() {
        let mut session = session(red_kills("t"));
        session.apply_edit(EditOperation::DeleteColor { name: "red".into() });

        let issues = session.issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("red"));
        assert!(issues[0].contains("kills"));
        assert!(!session.save_possible());

        session.undo();
        assert!(session.save_possible());
    }

    #[test]
    fn test_invalid_color_text_blocks_save() {
        let mut session = session(red_kills("t"));
        session.apply_edit(EditOperation::SetColor { name: "red".into(), value: "not-a-color".into() });

        let issues = session.issues();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("red"));
        assert!(!session.save_possible());

        session.undo();
        session.apply_edit(EditOperation::RenameNightColor {
            from: "night-red".into(),
            to: "night-crimson".into(),
            value: "#zzzzzz".into(),
        });
        assert!(!session.save_possible());
    }

    #[test]
    fn test_unchanged_theme_with_issues_can_save() {
        let broken = Theme::new("broken").with_use_case("kills", UseCaseValue::color_ref("gone"));
        let mut session = session(broken);
        assert_eq!(session.issues().len(), 1);
        assert!(session.save_possible());

        session.rename_theme("renamed").unwrap();
        assert!(session.save_possible());
    }

    #[test]
    fn test_stylesheet_uses_pending_edits() {
        let mut session = session(red_kills("t"));
        session.apply_edit(EditOperation::SetNightOverride {
            path: UseCasePath::parse("kills"),
            value: UseCaseValue::color_ref("blue"),
        });
        session.apply_edit(EditOperation::SetColor { name: "blue".into(), value: "#0000ff".into() });

        let css = session.stylesheet(None, &StylesheetScope::Site);
        let night = css.split(".night-mode-colors {").nth(1).unwrap();
        assert!(night.contains("--color-kills: var(--color-blue);"));
    }

    #[test]
    fn test_rename_theme_validates() {
        let mut session = session(red_kills("t"));
        assert!(session.rename_theme("").is_err());
        assert_eq!(session.name(), "t");
        session.rename_theme("new name").unwrap();
        assert_eq!(session.current_theme().name, "new name");
    }

    // ==========================================================================
    // Save
    // ==========================================================================

    #[tokio::test]
    async fn test_save_clears_history_and_updates_baseline() {
        let storage = Arc::new(local_storage());
        let mut session =
            ThemeEditSession::from_theme(storage.clone(), red_kills("t"), Permissions::none());
        session.apply_edit(EditOperation::SetColor { name: "red".into(), value: "#aa0000".into() });
        session.undo();
        session.redo();

        session.save().await.unwrap();

        assert!(!session.can_undo());
        assert!(!session.can_redo());
        assert!(!session.has_changes());
        assert_eq!(session.baseline().colors.get("red").map(String::as_str), Some("#aa0000"));
        let stored = storage.get("t").await.unwrap();
        assert_eq!(stored.colors.get("red").map(String::as_str), Some("#aa0000"));
    }

    #[tokio::test]
    async fn test_save_refused_with_issues() {
        let mut session = session(red_kills("t"));
        session.apply_edit(EditOperation::DeleteColor { name: "red".into() });

        let result = session.save().await;
        assert!(matches!(result, Err(EditorError::ValidationFailed(ref issues)) if issues.len() == 1));
        assert!(session.can_undo());
    }

    #[tokio::test]
    async fn test_save_refused_for_invalid_color_text() {
        let storage = Arc::new(local_storage());
        let mut session =
            ThemeEditSession::from_theme(storage.clone(), red_kills("t"), Permissions::none());
        session.apply_edit(EditOperation::SetColor { name: "red".into(), value: "not-a-color".into() });

        let result = session.save().await;
        assert!(matches!(result, Err(EditorError::ValidationFailed(ref issues)) if issues.len() == 1));
        assert!(storage.list_local().await.unwrap().is_empty());
        assert!(session.has_changes());
    }

    #[tokio::test]
    async fn test_save_after_rename_moves_local_entry() {
        let storage = Arc::new(local_storage());
        storage
            .save(&SaveThemeRequest::new(red_kills("old")), &Permissions::none())
            .await
            .unwrap();

        let mut session =
            ThemeEditSession::open(storage.clone(), "old", Permissions::none()).await.unwrap();
        session.rename_theme("new").unwrap();
        session.save().await.unwrap();

        assert_eq!(storage.list_local().await.unwrap(), vec!["new".to_string()]);
        assert_eq!(session.baseline().name, "new");
    }

    #[tokio::test]
    async fn test_remote_failure_still_clears_stacks() {
        let mut remote = MockRepository::new();
        remote.expect_save().returning(|_| {
            Err(StorageError::Remote { status: Some(500), message: "down".into() })
        });
        let storage = Arc::new(storage_with_remote(remote));

        let mut session = ThemeEditSession::from_theme(
            storage.clone(),
            red_kills("t"),
            Permissions::theme_manager(),
        );
        session.apply_edit(EditOperation::SetColor { name: "red".into(), value: "#aa0000".into() });

        let outcome = session.save().await.unwrap();
        assert!(matches!(outcome.remote, RemoteSaveStatus::Failed(_)));
        assert!(!session.can_undo());
        assert_eq!(storage.alerts().current().len(), 1);
        assert_eq!(storage.list_local().await.unwrap(), vec!["t".to_string()]);
    }
}
