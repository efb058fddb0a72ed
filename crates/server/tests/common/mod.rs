//! Common test utilities for API tests with a mock provider.
//!
//! The fixture builds the real router over a tempfile-backed SQLite database,
//! a `MockCatalogProvider` and a `ManualClock`, and drives it in-process.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use popflix_core::testing::{ManualClock, MockCatalogProvider};
use popflix_core::{load_config_from_str, ContentKind, SqlitePool};
use popflix_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use popflix_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_trending() {
///     let fixture = TestFixture::new().await;
///     fixture.seed_trending(ContentKind::Movie, 25).await;
///
///     let response = fixture.get("/api/movies/trending?page=1").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    pub router: Router,
    /// Mock provider - configure listings, details, reviews, availability
    pub provider: Arc<MockCatalogProvider>,
    /// Manual clock driving cache expiry
    pub clock: Arc<ManualClock>,
    pub pool: Arc<SqlitePool>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = load_config_from_str(&format!(
            r#"
[server]
host = "127.0.0.1"
port = 4000

[database]
path = "{}"
pool_size = 4

[tmdb]
api_key = "test-key"

[cache]
ttl_secs = 300
capacity = 32

[catalog]
availability_sync_secs = 0
"#,
            db_path.display()
        ))
        .expect("Failed to parse test config");

        let pool = Arc::new(
            SqlitePool::open(&db_path, 4, Duration::from_secs(5)).expect("Failed to open pool"),
        );
        let provider = Arc::new(MockCatalogProvider::new());
        let clock = Arc::new(ManualClock::new());

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&pool),
            Arc::clone(&provider) as Arc<dyn popflix_core::CatalogProvider>,
            Arc::clone(&clock) as Arc<dyn popflix_core::Clock>,
        ));

        Self {
            router: create_router(state),
            provider,
            clock,
            pool,
            temp_dir,
        }
    }

    /// Configure `count` trending titles (external ids `1..=count`).
    pub async fn seed_trending(&self, kind: ContentKind, count: u32) {
        self.provider
            .set_trending(kind, fixtures::provider_titles(count))
            .await;
    }

    /// Register a user through the API and return its id.
    pub async fn register_user(&self, email: &str) -> i64 {
        let response = self
            .post(
                "/api/auth/register",
                json!({
                    "firstName": "Ana",
                    "lastName": "García",
                    "email": email,
                    "phone": "+34 600 123 456",
                    "password": "supersecret"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["userId"].as_i64().expect("userId")
    }

    /// Local id of the first trending item of a kind (loads the dimension).
    pub async fn first_trending_id(&self, kind: ContentKind) -> i64 {
        let response = self
            .get(&format!("/api/{}/trending", kind.envelope_key()))
            .await;
        response.body[kind.envelope_key()][0]["id"]
            .as_i64()
            .expect("trending item id")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Fetch a plain-text body (for `/metrics`).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
