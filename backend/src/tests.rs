//! Integration tests for the storefront publisher.

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::{Config, LogFormat, StorageBackend};
use crate::db::init_history_database;
use crate::ledger::PublishLedger;
use crate::storage::{open_object_store, ObjectMetadata, SharedObjectStore};
use crate::validation::OrphanPolicy;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    store: Option<SharedObjectStore>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            storage_backend: StorageBackend::Sqlite,
            object_db_path: temp_dir.path().join("objects.sqlite"),
            object_key: "site-data.json".to_string(),
            cache_seconds: 60,
            ledger_db_path: temp_dir.path().join("history.sqlite"),
            ledger_retention: 50,
            block_on_errors: true,
            orphan_policy: OrphanPolicy::Warn,
            price_warning_threshold: 100_000.0,
            max_body_bytes: 10 * 1024 * 1024,
        };
        tweak(&mut config);

        let store = open_object_store(&config)
            .await
            .expect("Failed to open object store");
        let history_pool = init_history_database(&config.ledger_db_path)
            .await
            .expect("Failed to init history DB");
        let ledger = PublishLedger::new(history_pool, config.ledger_retention);

        let state = AppState::new(store.clone(), ledger, config);
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            store,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn publish(&self, data: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/publish"))
            .json(&json!({ "data": data }))
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

fn catalog() -> Value {
    json!({
        "products": {
            "p1": {
                "name": "Pearl Clip",
                "price": 299,
                "compare_at_price": 399,
                "description": "Claw clip with faux pearls",
                "image": "https://cdn.example.com/p1.jpg",
                "category": "c1",
                "featured": true
            }
        },
        "categories": {
            "c1": { "name": "Hair", "image": "https://cdn.example.com/c1.jpg" }
        },
        "homepage_sections": [{ "type": "hero", "title": "New in" }]
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture.get("/health").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_publish_without_data() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/publish"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No data provided");
}

#[tokio::test]
async fn test_publish_then_read() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .publish(json!({
            "products": { "p1": { "name": "Clip", "price": 100 } },
            "categories": { "c1": { "name": "Hair" } }
        }))
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["fileName"], "site-data.json");
    assert_eq!(body["productCount"], 1);
    assert_eq!(body["categoryCount"], 1);
    assert!(body["uploadTime"].is_number());
    assert!(body["verifyTime"].is_number());
    let warnings: Vec<&str> = body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w.as_str().unwrap())
        .collect();
    assert!(warnings.contains(&"Product p1 missing description"));
    assert!(warnings.contains(&"Product p1 missing category"));
    let keys: Vec<&str> = body["dataKeys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    assert!(keys.contains(&"published_at"));
    assert!(keys.contains(&"navigation_settings"));
    assert_eq!(body["defaultsApplied"], json!(["navigation_settings"]));

    let read = fixture.get("/api/published-data").await;
    assert_eq!(read.status(), 200);
    assert_eq!(
        read.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    assert_eq!(
        read.headers()["cache-control"].to_str().unwrap(),
        "public, max-age=60"
    );
    assert!(read.headers().contains_key("x-uploaded-at"));
    let text = read.text().await.unwrap();
    assert_eq!(text.len() as u64, body["size"].as_u64().unwrap());

    let published: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(published["published_at"], body["published_at"]);
    assert_eq!(published["version"], "1.0");
    assert_eq!(published["products"]["p1"]["name"], "Clip");
    assert_eq!(published["navigation_settings"]["button_labels"]["home"], "Home");
}

#[tokio::test]
async fn test_sections_and_flags_survive_publish() {
    let fixture = TestFixture::new().await;

    let resp = fixture.publish(catalog()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["warnings"].as_array().unwrap().is_empty());

    let published: Value = fixture
        .get("/api/published-data")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(published["products"]["p1"]["featured"], true);
    assert_eq!(published["homepage_sections"][0]["title"], "New in");
}

#[tokio::test]
async fn test_publish_blocked_by_validation_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .publish(json!({
            "products": {},
            "categories": { "c1": { "name": "Hair" } }
        }))
        .await;

    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e.as_str().unwrap().contains("products")));

    // Nothing was written
    assert_eq!(fixture.get("/api/published-data").await.status(), 404);

    // But the attempt was recorded
    let history: Value = fixture
        .get("/api/publish-history")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["status"], "failed");
    assert!(history[0]["errorMessage"]
        .as_str()
        .unwrap()
        .contains("Cannot publish without products"));
}

#[tokio::test]
async fn test_compare_at_price_below_price_blocks() {
    let fixture = TestFixture::new().await;

    let mut data = catalog();
    data["products"]["p1"]["compare_at_price"] = json!(199);
    let resp = fixture.publish(data).await;

    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["errors"][0],
        "Product p1 compare-at price 199 is lower than price 299"
    );
}

#[tokio::test]
async fn test_non_blocking_mode_publishes_with_warnings() {
    let fixture = TestFixture::with_config(|config| config.block_on_errors = false).await;

    let resp = fixture
        .publish(json!({
            "products": {},
            "categories": { "c1": { "name": "Hair" } }
        }))
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w == "Cannot publish without products"));
}

#[tokio::test]
async fn test_malformed_data_is_bad_request() {
    let fixture = TestFixture::new().await;

    let resp = fixture.publish(json!({ "products": [1, 2, 3] })).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_validate_does_not_publish() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/validate"))
        .json(&json!({ "data": catalog() }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["stats"]["productCount"], 1);
    assert_eq!(body["stats"]["categoryCount"], 1);

    assert_eq!(fixture.get("/api/published-data").await.status(), 404);
    let history: Value = fixture
        .get("/api/publish-history")
        .await
        .json()
        .await
        .unwrap();
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_nothing_published() {
    let fixture = TestFixture::new().await;

    let resp = fixture.get("/api/published-data").await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No published data found");
    assert_eq!(body["fallback"], true);
}

#[tokio::test]
async fn test_catalog_falls_back_then_serves_published() {
    let fixture = TestFixture::new().await;

    let resp = fixture.get("/api/catalog").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-data-source"], "sample");
    assert_eq!(resp.headers()["x-fallback-reason"], "not-published");
    let sample: Value = resp.json().await.unwrap();
    assert!(!sample["products"].as_object().unwrap().is_empty());
    assert!(!sample["categories"].as_object().unwrap().is_empty());

    assert_eq!(fixture.publish(catalog()).await.status(), 200);

    let resp = fixture.get("/api/catalog").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-data-source"], "published");
    assert!(resp.headers().get("x-fallback-reason").is_none());
    let published: Value = resp.json().await.unwrap();
    assert_eq!(published["products"]["p1"]["name"], "Pearl Clip");
}

#[tokio::test]
async fn test_corrupted_data_is_reported() {
    let fixture = TestFixture::new().await;

    fixture
        .store
        .as_ref()
        .unwrap()
        .put(
            "site-data.json",
            b"{\"products\": {".to_vec(),
            ObjectMetadata::json(60),
        )
        .await
        .unwrap();

    let resp = fixture.get("/api/published-data").await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "CORRUPTED_DATA");
    assert!(body.get("fallback").is_none());

    let resp = fixture.get("/api/catalog").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-data-source"], "sample");
    assert_eq!(resp.headers()["x-fallback-reason"], "corrupted");
}

#[tokio::test]
async fn test_storage_disabled() {
    let fixture =
        TestFixture::with_config(|config| config.storage_backend = StorageBackend::Disabled).await;

    let resp = fixture.publish(catalog()).await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "CONFIGURATION_ERROR");
    assert!(body["timestamp"].is_string());

    let resp = fixture.get("/api/published-data").await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "CONFIGURATION_ERROR");

    let resp = fixture.get("/api/catalog").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-fallback-reason"], "unconfigured");

    let history: Value = fixture
        .get("/api/publish-history")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(history[0]["status"], "failed");
    assert_eq!(history[0]["errorMessage"], "Object storage is not configured");
}

#[tokio::test]
async fn test_history_and_stats() {
    let fixture = TestFixture::new().await;

    let stats: Value = fixture
        .get("/api/publish-history/stats")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalAttempts"], 0);
    assert_eq!(stats["successRate"], 0.0);
    assert!(stats["lastPublishTime"].is_null());

    assert_eq!(fixture.publish(catalog()).await.status(), 200);
    assert_eq!(fixture.publish(json!({ "products": {} })).await.status(), 422);
    assert_eq!(fixture.publish(catalog()).await.status(), 200);

    let history: Value = fixture
        .get("/api/publish-history")
        .await
        .json()
        .await
        .unwrap();
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["status"], "success");
    assert_eq!(entries[1]["status"], "failed");
    assert_eq!(entries[0]["dataStats"]["products"], 1);
    assert!(entries[0]["dataStats"]["totalSize"].as_i64().unwrap() > 0);
    assert!(entries[0]["uploadTime"].is_number());

    let stats: Value = fixture
        .get("/api/publish-history/stats")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalAttempts"], 3);
    assert_eq!(stats["successfulPublishes"], 2);
    assert_eq!(stats["failedPublishes"], 1);
    assert_eq!(stats["successRate"], 66.7);
    assert_eq!(stats["lastPublishTime"], entries[0]["timestamp"]);

    let resp = fixture
        .client
        .delete(fixture.url("/api/publish-history"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["removed"], 3);

    let history: Value = fixture
        .get("/api/publish-history")
        .await
        .json()
        .await
        .unwrap();
    assert!(history.as_array().unwrap().is_empty());

    // Clearing history does not touch the published snapshot
    assert_eq!(fixture.get("/api/published-data").await.status(), 200);
}

#[tokio::test]
async fn test_history_retention() {
    let fixture = TestFixture::with_config(|config| config.ledger_retention = 2).await;

    for _ in 0..3 {
        assert_eq!(fixture.publish(catalog()).await.status(), 200);
    }

    let history: Value = fixture
        .get("/api/publish-history")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_status_and_unpublish() {
    let fixture = TestFixture::new().await;

    let status: Value = fixture.get("/api/status").await.json().await.unwrap();
    assert_eq!(status["storage"], "sqlite");
    assert_eq!(status["objectKey"], "site-data.json");
    assert_eq!(status["published"], false);

    let publish: Value = fixture.publish(catalog()).await.json().await.unwrap();

    let status: Value = fixture.get("/api/status").await.json().await.unwrap();
    assert_eq!(status["published"], true);
    assert_eq!(status["size"], publish["size"]);

    let resp = fixture
        .client
        .delete(fixture.url("/api/published-data"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["removed"], true);

    let resp = fixture.get("/api/catalog").await;
    assert_eq!(resp.headers()["x-fallback-reason"], "not-published");
}
