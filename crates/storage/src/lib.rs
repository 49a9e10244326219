//! Storage layer for dashboard themes
//!
//! This crate provides the device key-value store, an in-memory theme
//! cache, and the [`repository::ThemeRepository`] interface with its local
//! implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod kv;
pub mod repository;

pub use cache::{CacheConfig, MemoryCache};
pub use kv::{KvConfig, KvError, KvStore, KEY_SEPARATOR};
pub use repository::{
    LocalThemeRepository, SaveThemeRequest, StorageError, ThemeRepository, REGISTRY_KEY,
};
