//! Review submission and aggregation.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestFixture;
use popflix_core::ContentKind;

async fn setup() -> (TestFixture, i64, i64) {
    let fixture = TestFixture::new().await;
    let user_id = fixture.register_user("ana@example.com").await;
    fixture.seed_trending(ContentKind::Movie, 1).await;
    let item_id = fixture.first_trending_id(ContentKind::Movie).await;
    (fixture, user_id, item_id)
}

#[tokio::test]
async fn test_submit_review() {
    let (fixture, user_id, item_id) = setup().await;

    let response = fixture
        .post(
            "/api/reviews",
            json!({
                "userId": user_id,
                "movieId": item_id,
                "rating": 8,
                "content": "  Great pacing and a strong ending.  "
            }),
        )
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_json_path!(response.body, "userId", json!(user_id));
    assert_json_path!(response.body, "movieId", json!(item_id));
    assert_json_path!(response.body, "rating", json!(8));
    assert_json_path!(
        response.body,
        "content",
        json!("Great pacing and a strong ending.")
    );
    assert_json_path!(response.body, "author", json!("Ana García"));
}

#[tokio::test]
async fn test_second_review_replaces_first() {
    let (fixture, user_id, item_id) = setup().await;

    let first = fixture
        .post(
            "/api/reviews",
            json!({"userId": user_id, "movieId": item_id, "rating": 5, "content": "Average at best, honestly."}),
        )
        .await;
    let second = fixture
        .post(
            "/api/reviews",
            json!({"userId": user_id, "movieId": item_id, "rating": 9, "content": "Rewatched it and loved it."}),
        )
        .await;
    assert_status!(second, StatusCode::CREATED);
    assert_eq!(first.body["id"], second.body["id"]);

    let response = fixture
        .get(&format!("/api/movies/{}/reviews", item_id))
        .await;
    let reviews = response.body["reviews"].as_array().unwrap();
    let user_reviews: Vec<_> = reviews.iter().filter(|r| r["source"] == "user").collect();
    assert_eq!(user_reviews.len(), 1);
    assert_eq!(user_reviews[0]["content"], "Rewatched it and loved it.");
    assert_eq!(user_reviews[0]["rating"], 9.0);
    // user reviews come first, placeholders pad to three
    assert_eq!(reviews[0]["source"], "user");
    assert_eq!(reviews.len(), 3);
}

#[tokio::test]
async fn test_review_validation() {
    let (fixture, user_id, item_id) = setup().await;

    let response = fixture
        .post(
            "/api/reviews",
            json!({"userId": user_id, "movieId": item_id, "rating": 11, "content": "Long enough content"}),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let response = fixture
        .post(
            "/api/reviews",
            json!({"userId": user_id, "movieId": item_id, "rating": 0, "content": "Long enough content"}),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let response = fixture
        .post(
            "/api/reviews",
            json!({"userId": user_id, "movieId": item_id, "rating": 7, "content": "  too short "}),
        )
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let response = fixture
        .post("/api/reviews", json!({"userId": user_id, "rating": 7}))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_for_unknown_item() {
    let (fixture, user_id, _) = setup().await;

    let response = fixture
        .post(
            "/api/reviews",
            json!({"userId": user_id, "movieId": 4242, "rating": 7, "content": "Nothing to see here"}),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}
