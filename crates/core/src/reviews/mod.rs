//! User reviews and the merged review list shown on item pages.

mod aggregate;
mod sqlite;
mod types;

pub use aggregate::{aggregate, PLACEHOLDER_POOL_SIZE};
pub use sqlite::SqliteReviewStore;
pub use types::*;

use chrono::{DateTime, Utc};

use crate::db::StoreError;

/// Storage for user reviews.
pub trait ReviewStore: Send + Sync {
    /// Insert or replace the user's review of an item.
    ///
    /// One row per (user, item): a second submission updates rating, content
    /// and `updated_at` while keeping the original `created_at`.
    fn upsert(&self, review: &NewReview, now: DateTime<Utc>) -> Result<Review, StoreError>;

    /// Reviews for an item, newest first.
    fn list_for_item(&self, item_id: i64) -> Result<Vec<Review>, StoreError>;
}
