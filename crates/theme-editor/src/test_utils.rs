//! Test doubles and fixtures for editor tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use storage::repository::{Result, SaveThemeRequest, ThemeRepository};
use storage::{CacheConfig, KvStore, LocalThemeRepository};
use theme_core::theme::Theme;
use theme_core::use_case::UseCaseValue;

use crate::alerts::AlertCenter;
use crate::theme_storage::ThemeStorage;

mockall::mock! {
    pub Repository {}

    #[async_trait]
    impl ThemeRepository for Repository {
        async fn get(&self, name: &str) -> Result<Option<Theme>>;
        async fn save(&self, request: &SaveThemeRequest) -> Result<()>;
        async fn delete(&self, name: &str) -> Result<bool>;
        async fn list(&self) -> Result<Vec<String>>;
    }
}

/// Local repository over a temporary in-memory store
pub fn local_repository() -> Arc<LocalThemeRepository> {
    Arc::new(LocalThemeRepository::new(Arc::new(KvStore::in_memory().unwrap())))
}

/// Storage facade with only a local store
pub fn local_storage() -> ThemeStorage {
    ThemeStorage::new(local_repository(), CacheConfig::default())
}

/// Storage facade with a local store and the given remote
pub fn storage_with_remote(remote: MockRepository) -> ThemeStorage {
    local_storage()
        .with_remote(Arc::new(remote))
        .with_alerts(Arc::new(AlertCenter::default()))
}

/// Theme with one color and one use case referencing it
pub fn red_kills(name: &str) -> Theme {
    Theme::new(name)
        .with_color("red", "#ff0000")
        .with_use_case("kills", UseCaseValue::color_ref("red"))
}
