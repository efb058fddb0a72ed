//! Catalog API handlers.
//!
//! Every handler here is mounted twice, under `/api/movies` and
//! `/api/series`; the content kind arrives as a request extension.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use tracing::error;

use popflix_core::{
    CatalogItem, ContentKind, Dimension, DisplayReview, Genre, ItemDetails, Platform, Slice,
};

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
}

/// One page of a dimension, under the `movies` or `series` key.
#[derive(Debug)]
pub struct SliceResponse {
    pub kind: ContentKind,
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub total_pages: u32,
    pub message: Option<String>,
}

impl SliceResponse {
    pub fn new(kind: ContentKind, slice: Slice) -> Self {
        Self {
            kind,
            items: slice.items,
            page: slice.page,
            total_pages: slice.total_pages,
            message: None,
        }
    }

    /// Envelope returned alongside a 500.
    pub fn failed(kind: ContentKind, page: u32, message: String) -> Self {
        Self {
            kind,
            items: Vec::new(),
            page,
            total_pages: 0,
            message: Some(message),
        }
    }
}

impl Serialize for SliceResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.message.is_some() { 5 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(self.kind.envelope_key(), &self.items)?;
        map.serialize_entry("count", &self.items.len())?;
        map.serialize_entry("page", &self.page)?;
        map.serialize_entry("totalPages", &self.total_pages)?;
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct GenresResponse {
    pub genres: Vec<Genre>,
}

#[derive(Debug, serde::Serialize)]
pub struct ItemPlatformsResponse {
    pub platforms: Vec<Platform>,
}

#[derive(Debug, serde::Serialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<DisplayReview>,
    pub count: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct RankingResponse {
    pub ranking: Vec<CatalogItem>,
}

// ============================================================================
// Helpers
// ============================================================================

fn requested_page(params: Result<Query<PageParams>, QueryRejection>) -> Result<u32, ApiError> {
    let Query(params) = params?;
    Ok(params.page.unwrap_or(1))
}

async fn slice_response(
    state: &AppState,
    kind: ContentKind,
    dimension: Dimension,
    page: u32,
) -> Response {
    match state.catalog().slice(kind, &dimension, page).await {
        Ok(slice) => Json(SliceResponse::new(kind, slice)).into_response(),
        Err(e) => {
            let api_error = ApiError::from(e);
            if api_error.status() != StatusCode::INTERNAL_SERVER_ERROR {
                return api_error.into_response();
            }
            if let ApiError::Internal(detail) = &api_error {
                error!(kind = %kind, dimension = ?dimension, error = %detail, "Catalog slice failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SliceResponse::failed(
                    kind,
                    page,
                    api_error.public_message(),
                )),
            )
                .into_response()
        }
    }
}

async fn genre_slice(
    state: &AppState,
    kind: ContentKind,
    genre: Result<Path<String>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path(genre) = genre?;
    let page = requested_page(params)?;
    let genre = state.catalog().resolve_genre(&genre)?;
    Ok(slice_response(state, kind, Dimension::Genre(genre.provider_id(kind)), page).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/{kind}/trending
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let page = requested_page(params)?;
    Ok(slice_response(&state, kind, Dimension::Trending, page).await)
}

/// GET /api/{kind}/top-rated
pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let page = requested_page(params)?;
    Ok(slice_response(&state, kind, Dimension::TopRated, page).await)
}

/// GET /api/{kind}/genre/{genre} and the /api/{kind}/{genreSlug} shortcut
///
/// The genre may be given by id, slug or name.
pub async fn by_genre(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    genre: Result<Path<String>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    genre_slice(&state, kind, genre, params).await
}

/// GET /api/{kind}/search/{query}
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    query: Result<Path<String>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path(query) = query?;
    let page = requested_page(params)?;
    Ok(slice_response(&state, kind, Dimension::search(&query), page).await)
}

/// GET /api/{kind}/user/{userId}/by-platforms
pub async fn by_platforms(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    user_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path(user_id) = user_id?;
    let page = requested_page(params)?;
    Ok(slice_response(&state, kind, Dimension::UserPlatforms(user_id), page).await)
}

/// GET /api/{kind}/{itemId}/details
pub async fn details(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    item_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ItemDetails>, ApiError> {
    let Path(item_id) = item_id?;
    Ok(Json(state.catalog().details(kind, item_id).await?))
}

/// GET /api/{kind}/{itemId}/platforms
pub async fn item_platforms(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    item_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ItemPlatformsResponse>, ApiError> {
    let Path(item_id) = item_id?;
    let platforms = state.catalog().item_platforms(kind, item_id).await?;
    Ok(Json(ItemPlatformsResponse { platforms }))
}

/// GET /api/{kind}/{itemId}/reviews
pub async fn item_reviews(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<ContentKind>,
    item_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let Path(item_id) = item_id?;
    let reviews = state.catalog().reviews(kind, item_id).await?;
    Ok(Json(ReviewsResponse {
        count: reviews.len(),
        reviews,
    }))
}

/// GET /api/genres
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenresResponse>, ApiError> {
    Ok(Json(GenresResponse {
        genres: state.catalog().genres()?,
    }))
}

/// GET /api/weekly-ranking/{userId}
pub async fn weekly_ranking(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<RankingResponse>, ApiError> {
    let Path(user_id) = user_id?;
    Ok(Json(RankingResponse {
        ranking: state.catalog().weekly_ranking(user_id)?,
    }))
}
