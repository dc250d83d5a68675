//! SQLite-backed object store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::{ObjectMetadata, ObjectStore, ObjectSummary, StorageError, StoredObject};

/// Durable object store keeping one row per key.
#[derive(Clone)]
pub struct SqliteObjectStore {
    pool: SqlitePool,
}

impl SqliteObjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObjectStore for SqliteObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError> {
        let row = sqlx::query(
            "SELECT body, content_type, cache_control, uploaded_at FROM objects WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredObject {
            body: row.get("body"),
            metadata: ObjectMetadata {
                content_type: row.get("content_type"),
                cache_control: row.get("cache_control"),
            },
            uploaded_at: row.get("uploaded_at"),
        }))
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let size = body.len() as i64;

        sqlx::query(
            r#"INSERT INTO objects (key, body, content_type, cache_control, size, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                body = excluded.body,
                content_type = excluded.content_type,
                cache_control = excluded.cache_control,
                size = excluded.size,
                uploaded_at = excluded.uploaded_at"#,
        )
        .bind(key)
        .bind(body)
        .bind(&metadata.content_type)
        .bind(&metadata.cache_control)
        .bind(size)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM objects WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectSummary>, StorageError> {
        let rows = sqlx::query(
            "SELECT key, size, uploaded_at FROM objects WHERE substr(key, 1, length(?)) = ? ORDER BY key",
        )
        .bind(prefix)
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ObjectSummary {
                key: row.get("key"),
                size: row.get("size"),
                uploaded_at: row.get("uploaded_at"),
            })
            .collect())
    }
}
