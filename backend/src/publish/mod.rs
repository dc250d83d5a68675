//! Snapshot publisher.
//!
//! A publish is one whole-document write to the well-known key followed by a
//! read-back of the same key. Success is only reported once the read-back
//! parses and matches the bytes that were written. Concurrent publishers are
//! not coordinated: the last write wins.

use std::time::Instant;

use crate::models::Snapshot;
use crate::storage::{ObjectMetadata, SharedObjectStore, StorageError};

/// Why a publish did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// No object store binding.
    #[error("Object storage is not configured")]
    NotConfigured,
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(String),
    #[error("Upload failed: {0}")]
    Write(StorageError),
    #[error("Delete failed: {0}")]
    Delete(StorageError),
    #[error("Verification read failed: {0}")]
    ReadBack(StorageError),
    #[error("Verification failed: object missing after write")]
    Missing,
    #[error("Verification failed: stored data is not valid JSON: {0}")]
    Corrupted(String),
    /// Read-back parsed but differs from what was written, e.g. another
    /// publisher overwrote the key in between.
    #[error("Verification failed: stored data differs from what was written")]
    Mismatch,
}

/// Outcome of a publish attempt, with per-phase timings.
#[derive(Debug)]
pub struct PublishReport {
    pub object_key: String,
    /// Length of the serialized document in bytes.
    pub size_bytes: usize,
    /// Write phase duration; `None` if the write was never completed.
    pub upload_time_ms: Option<u64>,
    /// Read-back phase duration; `None` if verification never ran.
    pub verify_time_ms: Option<u64>,
    pub error: Option<PublishError>,
}

impl PublishReport {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Writes snapshots to the object store and verifies them.
#[derive(Clone)]
pub struct Publisher {
    store: Option<SharedObjectStore>,
    object_key: String,
    cache_seconds: u64,
}

impl Publisher {
    pub fn new(
        store: Option<SharedObjectStore>,
        object_key: impl Into<String>,
        cache_seconds: u64,
    ) -> Self {
        Self {
            store,
            object_key: object_key.into(),
            cache_seconds,
        }
    }

    /// Remove the published object. Readers fall back to sample data afterwards.
    pub async fn unpublish(&self) -> Result<bool, PublishError> {
        let store = self.store.as_ref().ok_or(PublishError::NotConfigured)?;
        let removed = store
            .delete(&self.object_key)
            .await
            .map_err(PublishError::Delete)?;
        tracing::info!(key = %self.object_key, removed, "Unpublished snapshot");
        Ok(removed)
    }

    /// Serialize, write and verify a snapshot.
    pub async fn publish(&self, snapshot: &Snapshot) -> PublishReport {
        let mut report = PublishReport {
            object_key: self.object_key.clone(),
            size_bytes: 0,
            upload_time_ms: None,
            verify_time_ms: None,
            error: None,
        };

        match self.run(snapshot, &mut report).await {
            Ok(()) => tracing::info!(
                key = %self.object_key,
                size_bytes = report.size_bytes,
                upload_ms = ?report.upload_time_ms,
                verify_ms = ?report.verify_time_ms,
                "Snapshot published and verified"
            ),
            Err(e) => {
                tracing::error!(key = %self.object_key, "Publish failed: {}", e);
                report.error = Some(e);
            }
        }

        report
    }

    async fn run(&self, snapshot: &Snapshot, report: &mut PublishReport) -> Result<(), PublishError> {
        let store = self.store.as_ref().ok_or(PublishError::NotConfigured)?;

        let body = serde_json::to_string_pretty(snapshot)
            .map_err(|e| PublishError::Serialize(e.to_string()))?;
        report.size_bytes = body.len();

        let started = Instant::now();
        store
            .put(
                &self.object_key,
                body.clone().into_bytes(),
                ObjectMetadata::json(self.cache_seconds),
            )
            .await
            .map_err(PublishError::Write)?;
        report.upload_time_ms = Some(elapsed_ms(started));

        let started = Instant::now();
        let verified = self.verify(store, body.as_bytes()).await;
        report.verify_time_ms = Some(elapsed_ms(started));
        verified
    }

    async fn verify(&self, store: &SharedObjectStore, expected: &[u8]) -> Result<(), PublishError> {
        let object = store
            .get(&self.object_key)
            .await
            .map_err(PublishError::ReadBack)?
            .ok_or(PublishError::Missing)?;

        serde_json::from_slice::<serde_json::Value>(&object.body)
            .map_err(|e| PublishError::Corrupted(e.to_string()))?;

        if object.body != expected {
            return Err(PublishError::Mismatch);
        }

        Ok(())
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
