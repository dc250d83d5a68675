//! Publish history ledger.
//!
//! An append-only, bounded log of publish attempts kept in an operator-local
//! SQLite database. It is advisory: the object store read-back decides what is
//! actually published, and losing this history changes nothing for shoppers.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{DataStats, LedgerStats, NewPublishRecord, PublishRecord, PublishStatus};

/// Default number of entries retained.
pub const DEFAULT_RETENTION: usize = 50;

/// Repository for publish history entries.
#[derive(Clone)]
pub struct PublishLedger {
    pool: SqlitePool,
    retention: usize,
}

impl PublishLedger {
    pub fn new(pool: SqlitePool, retention: usize) -> Self {
        Self {
            pool,
            retention: retention.max(1),
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Append an entry, evicting the oldest entries beyond the retention bound.
    pub async fn record(&self, entry: NewPublishRecord) -> Result<PublishRecord, AppError> {
        let now = Utc::now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let record = PublishRecord {
            id: format!("{}-{}", now.timestamp_millis(), &suffix[..8]),
            timestamp: now.to_rfc3339(),
            status: entry.status,
            message: entry.message,
            data_stats: entry.data_stats,
            upload_time: entry.upload_time,
            verify_time: entry.verify_time,
            error_message: entry.error_message,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO publish_history (
                id, timestamp, status, message, product_count, category_count, total_size,
                upload_time_ms, verify_time_ms, error_message
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&record.id)
        .bind(&record.timestamp)
        .bind(record.status.as_str())
        .bind(&record.message)
        .bind(record.data_stats.map(|s| s.products))
        .bind(record.data_stats.map(|s| s.categories))
        .bind(record.data_stats.map(|s| s.total_size))
        .bind(record.upload_time)
        .bind(record.verify_time)
        .bind(&record.error_message)
        .execute(&mut *tx)
        .await?;

        let evicted = sqlx::query(
            "DELETE FROM publish_history WHERE seq NOT IN (SELECT seq FROM publish_history ORDER BY seq DESC LIMIT ?)",
        )
        .bind(self.retention as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if evicted.rows_affected() > 0 {
            tracing::debug!("Evicted {} old publish history entries", evicted.rows_affected());
        }
        tracing::info!(id = %record.id, status = record.status.as_str(), "Recorded publish attempt");

        Ok(record)
    }

    /// All retained entries, newest first.
    pub async fn list(&self) -> Result<Vec<PublishRecord>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, timestamp, status, message, product_count, category_count, total_size,
                upload_time_ms, verify_time_ms, error_message
            FROM publish_history ORDER BY seq DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| record_from_row(&row)).collect())
    }

    /// Remove every entry. Returns how many were removed.
    pub async fn clear(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM publish_history")
            .execute(&self.pool)
            .await?;
        tracing::info!("Cleared {} publish history entries", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Aggregate figures over the retained entries.
    pub async fn stats(&self) -> Result<LedgerStats, AppError> {
        let row = sqlx::query(
            r#"SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN status = 'success' THEN 1 ELSE 0 END), 0) AS successful
            FROM publish_history"#,
        )
        .fetch_one(&self.pool)
        .await?;
        let total: i64 = row.get("total");
        let successful: i64 = row.get("successful");

        let last = sqlx::query(
            "SELECT timestamp FROM publish_history WHERE status = 'success' ORDER BY seq DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(LedgerStats {
            total_attempts: total,
            successful_publishes: successful,
            failed_publishes: total - successful,
            success_rate: success_rate(successful, total),
            last_publish_time: last.map(|row| row.get("timestamp")),
        })
    }
}

/// Percentage of successful attempts, one decimal place; 0 with no attempts.
pub fn success_rate(successful: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (successful as f64 / total as f64 * 1000.0).round() / 10.0
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> PublishRecord {
    let status: String = row.get("status");
    let product_count: Option<i64> = row.get("product_count");
    let category_count: Option<i64> = row.get("category_count");
    let total_size: Option<i64> = row.get("total_size");

    PublishRecord {
        id: row.get("id"),
        timestamp: row.get("timestamp"),
        status: PublishStatus::from_str(&status).unwrap_or(PublishStatus::Failed),
        message: row.get("message"),
        data_stats: product_count.map(|products| DataStats {
            products,
            categories: category_count.unwrap_or(0),
            total_size: total_size.unwrap_or(0),
        }),
        upload_time: row.get("upload_time_ms"),
        verify_time: row.get("verify_time_ms"),
        error_message: row.get("error_message"),
    }
}
