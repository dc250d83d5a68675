//! SQLite connection setup and schema migrations.
//!
//! The object store and the publish history use separate database files:
//! the history is operator-local bookkeeping and must not share a fate with
//! the published data.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Open (creating if needed) the object store database and run its migrations.
pub async fn init_object_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let pool = connect(db_path).await?;
    run_object_migrations(&pool).await?;
    Ok(pool)
}

/// Open (creating if needed) the publish history database and run its migrations.
pub async fn init_history_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let pool = connect(db_path).await?;
    run_history_migrations(&pool).await?;
    Ok(pool)
}

async fn connect(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

async fn run_object_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS objects (
            key TEXT PRIMARY KEY,
            body BLOB NOT NULL,
            content_type TEXT NOT NULL,
            cache_control TEXT NOT NULL,
            size INTEGER NOT NULL,
            uploaded_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn run_history_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS publish_history (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            timestamp TEXT NOT NULL,
            status TEXT NOT NULL,
            message TEXT NOT NULL,
            product_count INTEGER,
            category_count INTEGER,
            total_size INTEGER,
            upload_time_ms INTEGER,
            verify_time_ms INTEGER,
            error_message TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_publish_history_status ON publish_history(status);")
        .execute(pool)
        .await?;

    Ok(())
}
