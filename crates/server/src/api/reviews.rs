//! Review submission handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use popflix_core::{NewReview, Review};

use super::error::ApiError;
use crate::state::AppState;

/// POST /api/reviews
///
/// A second review by the same user for the same item replaces the first.
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let Json(submission) = payload?;
    let review = submission.validate()?;

    let stored = state.reviews().upsert(&review, Utc::now())?;
    info!(
        review_id = stored.id,
        user_id = stored.user_id,
        item_id = stored.item_id,
        "Stored review"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}
