//! Configuration module for the storefront publisher.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::AppError;
use crate::ledger::DEFAULT_RETENTION;
use crate::validation::{OrphanPolicy, ValidationPolicy};

/// Which object store backs the published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
    /// No binding; publish and read report a configuration error.
    Disabled,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
            StorageBackend::Disabled => "disabled",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            "disabled" | "none" => Ok(StorageBackend::Disabled),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    pub storage_backend: StorageBackend,
    /// Path to the SQLite object store file
    pub object_db_path: PathBuf,
    /// Key the published snapshot is written under
    pub object_key: String,
    /// max-age advertised for the published snapshot
    pub cache_seconds: u64,
    /// Path to the publish history database file
    pub ledger_db_path: PathBuf,
    /// Number of publish history entries kept
    pub ledger_retention: usize,
    /// Whether hard validation errors stop a publish
    pub block_on_errors: bool,
    pub orphan_policy: OrphanPolicy,
    pub price_warning_threshold: f64,
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind_addr: parse_var("STOREFRONT_BIND_ADDR", "127.0.0.1:8080")?,
            log_level: env::var("STOREFRONT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: parse_var("STOREFRONT_LOG_FORMAT", "pretty")?,
            storage_backend: parse_var("STOREFRONT_STORAGE", "sqlite")?,
            object_db_path: env::var("STOREFRONT_OBJECT_DB")
                .unwrap_or_else(|_| "./data/objects.sqlite".to_string())
                .into(),
            object_key: env::var("STOREFRONT_OBJECT_KEY")
                .unwrap_or_else(|_| "site-data.json".to_string()),
            cache_seconds: parse_var("STOREFRONT_CACHE_SECONDS", "60")?,
            ledger_db_path: env::var("STOREFRONT_LEDGER_DB")
                .unwrap_or_else(|_| "./data/publish-history.sqlite".to_string())
                .into(),
            ledger_retention: parse_var(
                "STOREFRONT_LEDGER_RETENTION",
                &DEFAULT_RETENTION.to_string(),
            )?,
            block_on_errors: parse_var("STOREFRONT_BLOCK_ON_ERRORS", "true")?,
            orphan_policy: parse_var("STOREFRONT_ORPHAN_POLICY", "warn")?,
            price_warning_threshold: parse_var("STOREFRONT_PRICE_WARNING_THRESHOLD", "100000")?,
            max_body_bytes: parse_var("STOREFRONT_MAX_BODY_BYTES", "10485760")?,
        })
    }

    /// Validator settings derived from this configuration.
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            price_warning_threshold: self.price_warning_threshold,
            orphan_policy: self.orphan_policy,
        }
    }
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    parse_value(name, &raw)
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Configuration(format!("Invalid {} '{}': {}", name, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for name in [
            "STOREFRONT_BIND_ADDR",
            "STOREFRONT_LOG_LEVEL",
            "STOREFRONT_LOG_FORMAT",
            "STOREFRONT_STORAGE",
            "STOREFRONT_OBJECT_DB",
            "STOREFRONT_OBJECT_KEY",
            "STOREFRONT_CACHE_SECONDS",
            "STOREFRONT_LEDGER_DB",
            "STOREFRONT_LEDGER_RETENTION",
            "STOREFRONT_BLOCK_ON_ERRORS",
            "STOREFRONT_ORPHAN_POLICY",
            "STOREFRONT_PRICE_WARNING_THRESHOLD",
            "STOREFRONT_MAX_BODY_BYTES",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.storage_backend, StorageBackend::Sqlite);
        assert_eq!(config.object_db_path, PathBuf::from("./data/objects.sqlite"));
        assert_eq!(config.object_key, "site-data.json");
        assert_eq!(config.cache_seconds, 60);
        assert_eq!(config.ledger_retention, 50);
        assert!(config.block_on_errors);
        assert_eq!(config.orphan_policy, OrphanPolicy::Warn);
        assert_eq!(config.validation_policy().price_warning_threshold, 100000.0);
    }

    #[test]
    fn test_malformed_value_is_configuration_error() {
        let result: Result<u64, AppError> = parse_value("STOREFRONT_CACHE_SECONDS", "soon");
        match result {
            Err(AppError::Configuration(msg)) => assert!(msg.contains("STOREFRONT_CACHE_SECONDS")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_backend_names() {
        assert_eq!("SQLite".parse::<StorageBackend>(), Ok(StorageBackend::Sqlite));
        assert_eq!("none".parse::<StorageBackend>(), Ok(StorageBackend::Disabled));
        assert!("r2".parse::<StorageBackend>().is_err());
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
    }
}
