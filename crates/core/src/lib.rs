pub mod accounts;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod favorites;
pub mod metrics;
pub mod platforms;
pub mod provider;
pub mod reviews;
pub mod testing;

pub use accounts::{
    AccountError, AccountService, AccountStore, Credentials, Registration, SqliteAccountStore,
    User, UserSummary, ValidationError,
};
pub use cache::{CacheStats, CatalogCache, Clock, SystemClock};
pub use catalog::{
    AvailabilitySync, CatalogError, CatalogItem, CatalogService, CatalogSettings, CatalogStore,
    ContentKind, Dimension, Genre, ItemDetails, Slice, SqliteCatalogStore,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use db::{SqlitePool, StoreError};
pub use favorites::{Favorite, FavoriteStore, SqliteFavoriteStore};
pub use platforms::{Platform, PlatformStore, SqlitePlatformStore, UserPlatform};
pub use provider::{CatalogProvider, ProviderError, TmdbClient};
pub use reviews::{DisplayReview, NewReview, Review, ReviewStore, SqliteReviewStore};
