//! Streaming platform API handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use popflix_core::{Platform, UserPlatform};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PlatformsResponse {
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Serialize)]
pub struct UserPlatformsResponse {
    pub platforms: Vec<UserPlatform>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSelection {
    pub platform_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSavedResponse {
    pub message: String,
    pub platforms_count: usize,
}

/// GET /api/platforms
pub async fn list_platforms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlatformsResponse>, ApiError> {
    Ok(Json(PlatformsResponse {
        platforms: state.platforms().list()?,
    }))
}

/// GET /api/user/{userId}/platforms
pub async fn user_platforms(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserPlatformsResponse>, ApiError> {
    let Path(user_id) = user_id?;
    Ok(Json(UserPlatformsResponse {
        platforms: state.platforms().user_platforms(user_id)?,
    }))
}

/// POST /api/user/{userId}/platforms
///
/// Replaces the user's selection wholesale.
pub async fn save_user_platforms(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PlatformSelection>, JsonRejection>,
) -> Result<(StatusCode, Json<SelectionSavedResponse>), ApiError> {
    let Path(user_id) = user_id?;
    let Json(selection) = payload?;

    let count = state
        .platforms()
        .replace_selection(user_id, &selection.platform_ids)?;
    info!(user_id, count, "Saved platform selection");

    Ok((
        StatusCode::CREATED,
        Json(SelectionSavedResponse {
            message: "Platforms saved".to_string(),
            platforms_count: count,
        }),
    ))
}
