//! Storefront Publisher
//!
//! Validates admin catalog drafts, publishes them as a single verified JSON
//! snapshot, and serves that snapshot (or sample data) to the storefront.

mod api;
mod config;
mod db;
mod errors;
mod ledger;
mod models;
mod publish;
mod reader;
mod snapshot;
mod storage;
mod validation;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use ledger::PublishLedger;
use publish::Publisher;
use reader::SnapshotReader;
use storage::SharedObjectStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when object storage is disabled.
    pub store: Option<SharedObjectStore>,
    pub publisher: Arc<Publisher>,
    pub reader: Arc<SnapshotReader>,
    pub ledger: Arc<PublishLedger>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Option<SharedObjectStore>, ledger: PublishLedger, config: Config) -> Self {
        let publisher = Publisher::new(store.clone(), config.object_key.clone(), config.cache_seconds);
        let reader = SnapshotReader::new(store.clone(), config.object_key.clone());

        Self {
            store,
            publisher: Arc::new(publisher),
            reader: Arc::new(reader),
            ledger: Arc::new(ledger),
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }

    tracing::info!("Starting Storefront Publisher");
    tracing::info!("Storage backend: {}", config.storage_backend.as_str());
    tracing::info!("Object key: {}", config.object_key);
    tracing::info!("History database: {:?}", config.ledger_db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.block_on_errors {
        tracing::warn!("STOREFRONT_BLOCK_ON_ERRORS is off; invalid catalogs can be published");
    }

    // Initialize storage
    let store = storage::open_object_store(&config).await?;

    // Initialize publish history
    let history_pool = db::init_history_database(&config.ledger_db_path).await?;
    let ledger = PublishLedger::new(history_pool, config.ledger_retention);

    let bind_addr = config.bind_addr;
    let state = AppState::new(store, ledger, config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration: the admin dashboard and storefront are separate origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.max_body_bytes;

    // API routes
    let api_routes = Router::new()
        // Admin
        .route("/publish", post(api::publish))
        .route("/validate", post(api::validate_draft))
        .route(
            "/publish-history",
            get(api::list_history).delete(api::clear_history),
        )
        .route("/publish-history/stats", get(api::history_stats))
        .route("/status", get(api::get_status))
        // Storefront
        .route(
            "/published-data",
            get(api::get_published_data).delete(api::unpublish),
        )
        .route("/catalog", get(api::get_catalog));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
