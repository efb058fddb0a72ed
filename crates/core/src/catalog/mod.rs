//! Content catalog: items persisted from the provider, genres, and the
//! query service that serves paginated dimensions through the cache.

mod genres;
mod pagination;
mod service;
mod sqlite;
mod sync;
mod types;

pub use genres::{Genre, SeedGenre, SEED_GENRES};
pub use pagination::paginate;
pub use service::{CatalogService, CatalogSettings, WEEKLY_RANKING_SIZE};
pub use sqlite::SqliteCatalogStore;
pub(crate) use sqlite::{item_from_row, ITEM_COLUMNS};
pub use sync::AvailabilitySync;
pub use types::*;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::StoreError;
use crate::provider::{ProviderError, ProviderTitle};

/// Errors raised by catalog queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid page {0}: pages start at 1")]
    InvalidPage(u32),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Storage for catalog items, genres and availability.
pub trait CatalogStore: Send + Sync {
    /// Insert or refresh items keyed on (kind, external id).
    ///
    /// Returns the stored items in input order with their local ids.
    fn upsert_items(
        &self,
        kind: ContentKind,
        titles: &[ProviderTitle],
    ) -> Result<Vec<CatalogItem>, StoreError>;

    fn get_item(&self, id: i64) -> Result<Option<CatalogItem>, StoreError>;

    fn count_items(&self) -> Result<u64, StoreError>;

    /// All genres, ordered by name.
    fn genres(&self) -> Result<Vec<Genre>, StoreError>;

    /// Look up a genre by numeric id, slug or (case-insensitive) name.
    fn find_genre(&self, key: &str) -> Result<Option<Genre>, StoreError>;

    /// Items with at least one platform, most popular first.
    fn available_items(&self, kind: ContentKind) -> Result<Vec<AvailableItem>, StoreError>;

    /// Stored platform ids for an item, or `None` if availability was never
    /// fetched.
    fn item_platform_ids(&self, item_id: i64) -> Result<Option<Vec<i64>>, StoreError>;

    /// Replace an item's availability and mark it as checked.
    fn record_availability(
        &self,
        item_id: i64,
        platform_ids: &[i64],
        checked_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Most popular items whose availability was never fetched.
    fn unchecked_items(&self, kind: ContentKind, limit: usize)
        -> Result<Vec<CatalogItem>, StoreError>;
}
