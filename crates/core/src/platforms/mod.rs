//! Streaming platforms and per-user subscriptions.

mod filter;
mod sqlite;
mod types;

pub use filter::{filter_by_platforms, map_provider_ids};
pub use sqlite::SqlitePlatformStore;
pub use types::*;

use std::collections::HashSet;

use crate::db::StoreError;

/// Storage for platforms and user platform selections.
pub trait PlatformStore: Send + Sync {
    /// All platforms, ordered by name.
    fn list(&self) -> Result<Vec<Platform>, StoreError>;

    /// All platforms with the user's `selected` flag.
    fn user_platforms(&self, user_id: i64) -> Result<Vec<UserPlatform>, StoreError>;

    /// Ids of the platforms the user has selected. Empty for unknown users.
    fn selected_platform_ids(&self, user_id: i64) -> Result<HashSet<i64>, StoreError>;

    /// Replace the user's selection wholesale in one transaction.
    ///
    /// Returns the number of platforms now selected.
    fn replace_selection(&self, user_id: i64, platform_ids: &[i64]) -> Result<usize, StoreError>;
}
