//! Object storage binding for the published snapshot.
//!
//! The published catalog lives under a single well-known key. Backends only
//! need whole-object get/put semantics; there is no conditional write.

mod memory;
mod sqlite;

pub use memory::MemoryObjectStore;
pub use sqlite::SqliteObjectStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, StorageBackend};
use crate::errors::AppError;

/// Content type written with every JSON object.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Storage faults. Never used to signal a missing object.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backend rejected or failed the operation.
    #[error("object store backend error: {0}")]
    Backend(String),
    /// Transport or filesystem failure.
    #[error("object store io error: {0}")]
    Io(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(io) => StorageError::Io(io.to_string()),
            other => StorageError::Backend(other.to_string()),
        }
    }
}

/// HTTP-facing metadata stored alongside an object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub content_type: String,
    pub cache_control: String,
}

impl ObjectMetadata {
    /// JSON content with a short public cache lifetime.
    pub fn json(cache_seconds: u64) -> Self {
        Self {
            content_type: JSON_CONTENT_TYPE.to_string(),
            cache_control: format!("public, max-age={}", cache_seconds),
        }
    }
}

/// An object as returned by [`ObjectStore::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub metadata: ObjectMetadata,
    pub uploaded_at: String,
}

/// Listing entry returned by [`ObjectStore::list`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
    pub uploaded_at: String,
}

/// Minimal durable object storage abstraction.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object. `Ok(None)` means the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError>;

    /// Replace the object stored under `key` in a single write.
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), StorageError>;

    /// Remove an object. Returns whether anything was deleted.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// List objects whose key starts with `prefix`, ordered by key.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectSummary>, StorageError>;
}

/// Shared handle to the configured store.
pub type SharedObjectStore = Arc<dyn ObjectStore>;

/// Open the backend selected in the configuration.
///
/// Returns `None` when storage is disabled; callers report that as a
/// configuration error rather than as missing data.
pub async fn open_object_store(config: &Config) -> Result<Option<SharedObjectStore>, AppError> {
    match config.storage_backend {
        StorageBackend::Sqlite => {
            let pool = crate::db::init_object_database(&config.object_db_path).await?;
            Ok(Some(Arc::new(SqliteObjectStore::new(pool))))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory object store; published data will not survive restarts");
            Ok(Some(Arc::new(MemoryObjectStore::new())))
        }
        StorageBackend::Disabled => {
            tracing::warn!("Object storage is disabled; publish and read requests will fail");
            Ok(None)
        }
    }
}
