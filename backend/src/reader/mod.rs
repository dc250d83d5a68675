//! Storefront-side access to the published snapshot.
//!
//! [`SnapshotReader::fetch`] reports exactly what storage holds, for the raw
//! published-data endpoint. [`SnapshotReader::resolve`] never fails: when no
//! usable snapshot exists it hands back the sample catalog along with the
//! reason, so pages always have something to render.

use serde::Serialize;

use crate::models::Snapshot;
use crate::snapshot::sample_snapshot;
use crate::storage::{SharedObjectStore, StorageError, StoredObject};

/// What storage returned for the published key.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Object exists and its body is valid JSON.
    Found(StoredObject),
    /// Nothing has been published yet.
    NotFound,
    /// Object exists but does not parse.
    Corrupted(String),
    /// Storage call failed.
    Unavailable(StorageError),
    /// No storage binding.
    NotConfigured,
}

/// Why sample data was served instead of the published snapshot.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackReason {
    NotPublished,
    StorageError,
    Corrupted,
    Unconfigured,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::NotPublished => "not-published",
            FallbackReason::StorageError => "storage-error",
            FallbackReason::Corrupted => "corrupted",
            FallbackReason::Unconfigured => "unconfigured",
        }
    }
}

/// Where a resolved snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Published,
    Sample(FallbackReason),
}

#[derive(Debug, Clone)]
pub struct ResolvedSnapshot {
    pub snapshot: Snapshot,
    pub source: SnapshotSource,
}

impl ResolvedSnapshot {
    pub fn is_sample(&self) -> bool {
        matches!(self.source, SnapshotSource::Sample(_))
    }

    fn sample(reason: FallbackReason) -> Self {
        Self {
            snapshot: sample_snapshot(),
            source: SnapshotSource::Sample(reason),
        }
    }
}

/// Reads the published snapshot from the object store.
#[derive(Clone)]
pub struct SnapshotReader {
    store: Option<SharedObjectStore>,
    object_key: String,
}

impl SnapshotReader {
    pub fn new(store: Option<SharedObjectStore>, object_key: impl Into<String>) -> Self {
        Self {
            store,
            object_key: object_key.into(),
        }
    }

    /// Fetch the published object, classifying every failure mode.
    pub async fn fetch(&self) -> FetchOutcome {
        let Some(store) = &self.store else {
            return FetchOutcome::NotConfigured;
        };

        match store.get(&self.object_key).await {
            Ok(None) => FetchOutcome::NotFound,
            Err(e) => FetchOutcome::Unavailable(e),
            Ok(Some(object)) => match serde_json::from_slice::<serde_json::Value>(&object.body) {
                Ok(_) => FetchOutcome::Found(object),
                Err(e) => FetchOutcome::Corrupted(e.to_string()),
            },
        }
    }

    /// Resolve the snapshot to render, falling back to sample data.
    pub async fn resolve(&self) -> ResolvedSnapshot {
        match self.fetch().await {
            FetchOutcome::Found(object) => match serde_json::from_slice::<Snapshot>(&object.body) {
                Ok(snapshot) => ResolvedSnapshot {
                    snapshot,
                    source: SnapshotSource::Published,
                },
                Err(e) => {
                    tracing::error!(key = %self.object_key, "Published data has an unexpected shape: {}", e);
                    ResolvedSnapshot::sample(FallbackReason::Corrupted)
                }
            },
            FetchOutcome::NotFound => {
                tracing::info!(key = %self.object_key, "Nothing published yet, serving sample data");
                ResolvedSnapshot::sample(FallbackReason::NotPublished)
            }
            FetchOutcome::Corrupted(msg) => {
                tracing::error!(key = %self.object_key, "Published data is corrupted: {}", msg);
                ResolvedSnapshot::sample(FallbackReason::Corrupted)
            }
            FetchOutcome::Unavailable(e) => {
                tracing::warn!(key = %self.object_key, "Storage unavailable, serving sample data: {}", e);
                ResolvedSnapshot::sample(FallbackReason::StorageError)
            }
            FetchOutcome::NotConfigured => {
                tracing::warn!("Object storage is not configured, serving sample data");
                ResolvedSnapshot::sample(FallbackReason::Unconfigured)
            }
        }
    }
}
