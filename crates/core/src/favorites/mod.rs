//! Per-user favorite catalog items.

mod sqlite;

pub use sqlite::SqliteFavoriteStore;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::CatalogItem;
use crate::db::StoreError;

/// A favorited item.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub added_at: DateTime<Utc>,
}

/// Storage for favorites.
pub trait FavoriteStore: Send + Sync {
    /// Add (or re-add, refreshing `added_at`) an item to the user's favorites.
    ///
    /// Fails with [`StoreError::NotFound`] if the user or item does not exist.
    fn add(&self, user_id: i64, item_id: i64, added_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Remove a favorite. Returns `false` if it was not there.
    fn remove(&self, user_id: i64, item_id: i64) -> Result<bool, StoreError>;

    /// The user's favorites, most recently added first.
    fn list(&self, user_id: i64) -> Result<Vec<Favorite>, StoreError>;
}
