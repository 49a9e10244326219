//! Device key-value store
//!
//! JSON documents in a sled tree, addressed by `:`-joined keys such as
//! `themes:theme:dark`. The local theme repository keeps its registry and
//! one document per theme here.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Separator between key segments
pub const KEY_SEPARATOR: &str = ":";

/// Errors from the device store
#[derive(Debug, Error)]
pub enum KvError {
    /// sled failed to read or write
    #[error("Store error: {0}")]
    Sled(#[from] sled::Error),

    /// A stored document does not decode into the requested type
    #[error("Document {key} is unreadable: {source}")]
    Decode {
        /// Key of the document
        key: String,
        /// Decoder error
        source: serde_json::Error,
    },

    /// A value could not be encoded
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Empty key or key segment
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Join key segments, rejecting empty ones
pub fn key(segments: &[&str]) -> Result<String> {
    if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(KvError::InvalidKey(segments.join(KEY_SEPARATOR)));
    }
    Ok(segments.join(KEY_SEPARATOR))
}

/// Where and how the store is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KvConfig {
    /// Directory of the sled database
    pub path: String,
    /// Page cache size in bytes
    pub cache_capacity: u64,
    /// zstd compression of stored pages
    pub compression: bool,
    /// Background flush period; None leaves flushing to [`KvStore::flush`]
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "dashboard_themes.db".to_string(),
            cache_capacity: 8 * 1024 * 1024,
            compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Default settings at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Builder-style page cache size
    pub fn with_cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Builder-style compression switch
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Builder-style flush period
    pub fn with_flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// JSON document store over sled
///
/// Cloning is cheap and clones share the same database.
#[derive(Clone)]
pub struct KvStore {
    db: sled::Db,
}

impl KvStore {
    /// Open (or create) the database described by `config`
    pub fn open(config: &KvConfig) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.compression)
            .flush_every_ms(config.flush_every_ms)
            .open()?;
        tracing::debug!(path = %config.path, recovered = db.was_recovered(), "opened theme store");
        Ok(Self { db })
    }

    /// A store that lives only as long as this process
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Decode the document at `key`
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(bytes) = self.db.get(key)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| KvError::Decode { key: key.to_string(), source })
    }

    /// Encode `value` as the document at `key`
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.db.insert(key, serde_json::to_vec(value)?)?;
        Ok(())
    }

    /// Store bytes at `key` without encoding them
    pub fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.db.insert(key, bytes)?;
        Ok(())
    }

    /// Remove the document at `key`; returns whether one existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(key)?.is_some())
    }

    /// Whether a document exists at `key`
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.db.contains_key(key)?)
    }

    /// Keys starting with `prefix`, in byte order
    pub fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.db
            .scan_prefix(prefix)
            .keys()
            .map(|k| Ok(String::from_utf8_lossy(&k?).into_owned()))
            .collect()
    }

    /// Write buffered changes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}
