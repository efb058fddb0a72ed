use std::sync::Arc;
use std::time::Duration;

use popflix_core::{
    AccountService, CatalogCache, CatalogProvider, CatalogService, CatalogSettings, Clock, Config,
    FavoriteStore, PlatformStore, ReviewStore, SanitizedConfig, SqliteAccountStore,
    SqliteCatalogStore, SqliteFavoriteStore, SqlitePlatformStore, SqlitePool, SqliteReviewStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<CatalogService>,
    accounts: AccountService,
    platforms: Arc<dyn PlatformStore>,
    favorites: Arc<dyn FavoriteStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl AppState {
    /// Wire the stores, cache and catalog service over one connection pool.
    pub fn new(
        config: Config,
        pool: Arc<SqlitePool>,
        provider: Arc<dyn CatalogProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Arc::new(CatalogCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.capacity,
            clock,
        ));
        let platforms: Arc<dyn PlatformStore> = Arc::new(SqlitePlatformStore::new(pool.clone()));
        let reviews: Arc<dyn ReviewStore> = Arc::new(SqliteReviewStore::new(pool.clone()));

        let catalog = Arc::new(CatalogService::new(
            provider,
            cache,
            Arc::new(SqliteCatalogStore::new(pool.clone())),
            Arc::clone(&platforms),
            Arc::clone(&reviews),
            CatalogSettings::from(&config),
        ));

        Self {
            accounts: AccountService::new(Arc::new(SqliteAccountStore::new(pool.clone()))),
            favorites: Arc::new(SqliteFavoriteStore::new(pool)),
            config,
            catalog,
            platforms,
            reviews,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Shared handle for background tasks.
    pub fn catalog_handle(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn platforms(&self) -> &dyn PlatformStore {
        self.platforms.as_ref()
    }

    pub fn favorites(&self) -> &dyn FavoriteStore {
        self.favorites.as_ref()
    }

    pub fn reviews(&self) -> &dyn ReviewStore {
        self.reviews.as_ref()
    }
}
