//! Third-party catalog provider integration (TMDB).
//!
//! The provider is the source of truth for catalog metadata, reviews and
//! watch-provider availability. Everything it returns is written back to the
//! store by the catalog service.

mod tmdb;
mod types;

pub use tmdb::TmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::ContentKind;

/// Errors that can occur when talking to the catalog provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connection, timeout, ...).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// A remote catalog of movies and series.
///
/// Listing operations return one provider page at a time; the catalog
/// service decides how many pages make up a dimension.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Titles trending this week.
    async fn trending(&self, kind: ContentKind, page: u32) -> Result<ProviderPage, ProviderError>;

    /// Best rated titles.
    async fn top_rated(&self, kind: ContentKind, page: u32)
        -> Result<ProviderPage, ProviderError>;

    /// Titles in a genre, most popular first.
    async fn discover_by_genre(
        &self,
        kind: ContentKind,
        genre_id: u32,
        page: u32,
    ) -> Result<ProviderPage, ProviderError>;

    /// Free-text title search.
    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        page: u32,
    ) -> Result<ProviderPage, ProviderError>;

    /// Full metadata for one title.
    async fn details(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<ProviderDetails, ProviderError>;

    /// Published reviews for one title, in provider order.
    async fn reviews(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<Vec<ProviderReview>, ProviderError>;

    /// Watch-provider ids offering the title in the configured region
    /// (subscription, rent and buy), deduplicated.
    async fn watch_providers(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<Vec<u32>, ProviderError>;
}
