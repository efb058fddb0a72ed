//! Favorites API handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use popflix_core::Favorite;

use super::error::{ApiError, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Favorite>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub movie_id: i64,
}

/// GET /api/favorites/{userId}
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    let Path(user_id) = user_id?;
    let favorites = state.favorites().list(user_id)?;
    Ok(Json(FavoritesResponse {
        count: favorites.len(),
        favorites,
    }))
}

/// POST /api/favorites/{userId}
///
/// Re-adding an existing favorite refreshes its timestamp.
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Path(user_id) = user_id?;
    let Json(request) = payload?;

    state
        .favorites()
        .add(user_id, request.movie_id, Utc::now())?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Added to favorites")),
    ))
}

/// DELETE /api/favorites/{userId}/{movieId}
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path((user_id, item_id)) = ids?;

    if !state.favorites().remove(user_id, item_id)? {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }
    Ok(Json(MessageResponse::new("Removed from favorites")))
}
