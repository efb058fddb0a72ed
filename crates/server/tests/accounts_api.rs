//! Registration and login endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestFixture;

fn registration(email: &str) -> Value {
    json!({
        "firstName": "María",
        "lastName": "López",
        "email": email,
        "phone": "600-123-456",
        "password": "correct horse"
    })
}

#[tokio::test]
async fn test_register_and_login() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post("/api/auth/register", registration("Maria@Example.com"))
        .await;
    assert_status!(response, StatusCode::CREATED);
    let user_id = response.body["userId"].as_i64().unwrap();
    assert!(response.body["message"].is_string());

    let response = fixture
        .post(
            "/api/auth/login",
            json!({"email": "maria@example.com", "password": "correct horse"}),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body["user"], "id", json!(user_id));
    assert_json_path!(response.body["user"], "firstName", json!("María"));
    assert_json_path!(response.body["user"], "email", json!("maria@example.com"));
    assert!(response.body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_with_formatted_phone() {
    let fixture = TestFixture::new().await;

    let mut body = registration("formatted@example.com");
    body["phone"] = json!("(555) 123-4567");
    let response = fixture.post("/api/auth/register", body).await;
    assert_status!(response, StatusCode::CREATED);

    let response = fixture
        .post(
            "/api/auth/login",
            json!({"email": "formatted@example.com", "password": "correct horse"}),
        )
        .await;
    assert_status!(response, StatusCode::OK);

    let phone: String = fixture
        .pool
        .get()
        .unwrap()
        .query_row(
            "SELECT phone FROM users WHERE email = 'formatted@example.com'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(phone, "5551234567");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post("/api/auth/register", registration("dup@example.com"))
        .await;
    assert_status!(response, StatusCode::CREATED);

    let response = fixture
        .post("/api/auth/register", registration("DUP@example.com"))
        .await;
    assert_status!(response, StatusCode::CONFLICT);
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn test_registration_validation() {
    let fixture = TestFixture::new().await;

    let mut missing = registration("a@example.com");
    missing["phone"] = json!("");
    let response = fixture.post("/api/auth/register", missing).await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let mut bad_email = registration("not-an-email");
    bad_email["email"] = json!("not-an-email");
    let response = fixture.post("/api/auth/register", bad_email).await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let mut short_password = registration("b@example.com");
    short_password["password"] = json!("short");
    let response = fixture.post("/api/auth/register", short_password).await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let mut bad_name = registration("c@example.com");
    bad_name["firstName"] = json!("R2D2");
    let response = fixture.post("/api/auth/register", bad_name).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body() {
    let fixture = TestFixture::new().await;

    let response = fixture.post_raw("/api/auth/register", "{not json").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["message"].is_string());
}

#[tokio::test]
async fn test_login_failures_are_unauthorized() {
    let fixture = TestFixture::new().await;
    fixture
        .post("/api/auth/register", registration("maria@example.com"))
        .await;

    let response = fixture
        .post(
            "/api/auth/login",
            json!({"email": "maria@example.com", "password": "wrong password"}),
        )
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = fixture
        .post(
            "/api/auth/login",
            json!({"email": "nobody@example.com", "password": "whatever123"}),
        )
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = fixture
        .post("/api/auth/login", json!({"email": "", "password": ""}))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}
