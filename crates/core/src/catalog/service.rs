//! Catalog query service.
//!
//! Provider-backed dimensions are fetched with one provider call by default
//! (`max_pages` raises that), written back to the store, cached under the dimension key and
//! paged in memory. The by-platforms dimension is served from the store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{
    paginate, CatalogError, CatalogItem, CatalogStore, ContentKind, Dimension, Genre,
    ItemDetails, Slice,
};
use crate::cache::CatalogCache;
use crate::config::Config;
use crate::metrics::AVAILABILITY_CHECKS;
use crate::platforms::{filter_by_platforms, map_provider_ids, Platform, PlatformStore};
use crate::provider::{CatalogProvider, ProviderError, ProviderPage, ProviderTitle};
use crate::reviews::{aggregate, DisplayReview, ReviewStore};

/// Number of items in the weekly ranking.
pub const WEEKLY_RANKING_SIZE: usize = 3;

/// Paging knobs for the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Page size for trending, top-rated, genre and search.
    pub page_size: usize,
    /// Page size for the by-platforms dimension.
    pub platform_page_size: usize,
    /// Provider pages fetched per dimension refresh.
    pub max_pages: u32,
    /// Reviews are padded with placeholders up to this count.
    pub review_floor: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            platform_page_size: 30,
            max_pages: 1,
            review_floor: 3,
        }
    }
}

impl From<&Config> for CatalogSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.catalog.page_size,
            platform_page_size: config.catalog.platform_page_size,
            max_pages: config.tmdb.max_pages,
            review_floor: config.catalog.review_floor,
        }
    }
}

pub struct CatalogService {
    provider: Arc<dyn CatalogProvider>,
    cache: Arc<CatalogCache>,
    store: Arc<dyn CatalogStore>,
    platforms: Arc<dyn PlatformStore>,
    reviews: Arc<dyn ReviewStore>,
    settings: CatalogSettings,
}

impl CatalogService {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        cache: Arc<CatalogCache>,
        store: Arc<dyn CatalogStore>,
        platforms: Arc<dyn PlatformStore>,
        reviews: Arc<dyn ReviewStore>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            provider,
            cache,
            store,
            platforms,
            reviews,
            settings,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// One page (1-based) of a dimension.
    pub async fn slice(
        &self,
        kind: ContentKind,
        dimension: &Dimension,
        page: u32,
    ) -> Result<Slice, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidPage(page));
        }

        match dimension {
            Dimension::UserPlatforms(user_id) => {
                return self.platform_slice(kind, *user_id, page);
            }
            Dimension::Search(term) if term.trim().is_empty() => {
                return Err(CatalogError::InvalidQuery(
                    "search term cannot be empty".to_string(),
                ));
            }
            _ => {}
        }

        let items = self.dimension_items(kind, dimension).await?;
        Ok(paginate(&items, page, self.settings.page_size))
    }

    /// Full result set of a provider-backed dimension, from cache when fresh.
    async fn dimension_items(
        &self,
        kind: ContentKind,
        dimension: &Dimension,
    ) -> Result<Arc<Vec<CatalogItem>>, CatalogError> {
        let key = dimension.cache_key(kind).ok_or_else(|| {
            CatalogError::InvalidQuery(format!("{:?} is not a provider dimension", dimension))
        })?;

        if let Some(items) = self.cache.get(&key) {
            debug!(key = %key, "Serving dimension from cache");
            return Ok(items);
        }

        let titles = self.fetch_all(kind, dimension).await?;
        let items = self.store.upsert_items(kind, &titles)?;

        info!(key = %key, count = items.len(), "Refreshed catalog dimension");
        Ok(self.cache.insert(&key, items))
    }

    async fn fetch_all(
        &self,
        kind: ContentKind,
        dimension: &Dimension,
    ) -> Result<Vec<ProviderTitle>, ProviderError> {
        let mut titles = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1;

        loop {
            let result = self.fetch_page(kind, dimension, page).await?;
            let last_page = result.total_pages.min(self.settings.max_pages);
            let exhausted = result.items.is_empty();

            for title in result.items {
                if seen.insert(title.external_id) {
                    titles.push(title);
                }
            }

            if exhausted || page >= last_page {
                break;
            }
            page += 1;
        }

        Ok(titles)
    }

    async fn fetch_page(
        &self,
        kind: ContentKind,
        dimension: &Dimension,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        match dimension {
            Dimension::Trending => self.provider.trending(kind, page).await,
            Dimension::TopRated => self.provider.top_rated(kind, page).await,
            Dimension::Genre(genre_id) => {
                self.provider.discover_by_genre(kind, *genre_id, page).await
            }
            Dimension::Search(term) => self.provider.search(kind, term, page).await,
            Dimension::UserPlatforms(_) => Ok(ProviderPage::default()),
        }
    }

    /// Platforms the user has selected. Empty is a valid answer.
    pub fn resolve_user_platforms(&self, user_id: i64) -> Result<HashSet<i64>, CatalogError> {
        Ok(self.platforms.selected_platform_ids(user_id)?)
    }

    fn platform_items(
        &self,
        kind: ContentKind,
        user_id: i64,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let selected = self.resolve_user_platforms(user_id)?;
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let available = self.store.available_items(kind)?;
        Ok(filter_by_platforms(available, &selected))
    }

    fn platform_slice(
        &self,
        kind: ContentKind,
        user_id: i64,
        page: u32,
    ) -> Result<Slice, CatalogError> {
        let items = self.platform_items(kind, user_id)?;
        if items.is_empty() {
            return Ok(Slice::empty(page));
        }
        Ok(paginate(&items, page, self.settings.platform_page_size))
    }

    /// Most popular movies on the user's platforms.
    pub fn weekly_ranking(&self, user_id: i64) -> Result<Vec<CatalogItem>, CatalogError> {
        let mut items = self.platform_items(ContentKind::Movie, user_id)?;
        items.truncate(WEEKLY_RANKING_SIZE);
        Ok(items)
    }

    pub fn item_count(&self) -> Result<u64, CatalogError> {
        Ok(self.store.count_items()?)
    }

    pub fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        Ok(self.store.genres()?)
    }

    /// Resolve a genre path parameter (id, slug or name).
    pub fn resolve_genre(&self, key: &str) -> Result<Genre, CatalogError> {
        self.store
            .find_genre(key)?
            .ok_or_else(|| CatalogError::NotFound(format!("Genre '{}'", key)))
    }

    /// A stored item of the given kind.
    pub fn item(&self, kind: ContentKind, item_id: i64) -> Result<CatalogItem, CatalogError> {
        match self.store.get_item(item_id)? {
            Some(item) if item.kind == kind => Ok(item),
            _ => Err(CatalogError::NotFound(format!("{} {}", kind, item_id))),
        }
    }

    /// Stored item merged with the provider's details.
    pub async fn details(
        &self,
        kind: ContentKind,
        item_id: i64,
    ) -> Result<ItemDetails, CatalogError> {
        let item = self.item(kind, item_id)?;
        let details = self.provider.details(kind, item.external_id).await?;
        Ok(ItemDetails { item, details })
    }

    /// Platforms an item is available on.
    ///
    /// Availability is fetched from the provider the first time and stored;
    /// later calls read the store.
    pub async fn item_platforms(
        &self,
        kind: ContentKind,
        item_id: i64,
    ) -> Result<Vec<Platform>, CatalogError> {
        let item = self.item(kind, item_id)?;
        let platforms = self.platforms.list()?;

        let ids = match self.store.item_platform_ids(item.id)? {
            Some(ids) => ids,
            None => self.refresh_availability(&item, &platforms).await?,
        };

        Ok(platforms
            .into_iter()
            .filter(|p| ids.contains(&p.id))
            .collect())
    }

    async fn refresh_availability(
        &self,
        item: &CatalogItem,
        platforms: &[Platform],
    ) -> Result<Vec<i64>, CatalogError> {
        let provider_ids = match self
            .provider
            .watch_providers(item.kind, item.external_id)
            .await
        {
            Ok(ids) => ids,
            Err(e) => {
                AVAILABILITY_CHECKS.with_label_values(&["error"]).inc();
                return Err(e.into());
            }
        };

        let ids = map_provider_ids(&provider_ids, platforms);
        self.store.record_availability(item.id, &ids, Utc::now())?;
        AVAILABILITY_CHECKS.with_label_values(&["success"]).inc();

        debug!(
            item_id = item.id,
            platforms = ?ids,
            "Recorded item availability"
        );
        Ok(ids)
    }

    /// Fetch availability for up to `limit` items that were never checked.
    ///
    /// Returns the number of items checked. Stops early when the provider
    /// rate-limits.
    pub async fn sync_availability(
        &self,
        kind: ContentKind,
        limit: usize,
    ) -> Result<usize, CatalogError> {
        let pending = self.store.unchecked_items(kind, limit)?;
        if pending.is_empty() {
            return Ok(0);
        }

        let platforms = self.platforms.list()?;
        let mut checked = 0;

        for item in &pending {
            match self.refresh_availability(item, &platforms).await {
                Ok(_) => checked += 1,
                Err(CatalogError::Provider(ProviderError::RateLimitExceeded)) => {
                    warn!(kind = %kind, "Provider rate limit hit during availability sync");
                    break;
                }
                Err(e) => {
                    warn!(item_id = item.id, error = %e, "Availability lookup failed");
                }
            }
        }

        info!(kind = %kind, checked, pending = pending.len(), "Availability sync finished");
        Ok(checked)
    }

    /// Load the trending dimension so the store has items to resolve
    /// availability for.
    pub async fn warm_up(&self, kind: ContentKind) -> Result<(), CatalogError> {
        self.slice(kind, &Dimension::Trending, 1).await.map(|_| ())
    }

    /// Aggregated reviews for an item.
    ///
    /// Provider failures degrade to no provider reviews.
    pub async fn reviews(
        &self,
        kind: ContentKind,
        item_id: i64,
    ) -> Result<Vec<DisplayReview>, CatalogError> {
        let item = self.item(kind, item_id)?;
        let user_reviews = self.reviews.list_for_item(item.id)?;

        let provider_reviews = match self.provider.reviews(kind, item.external_id).await {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!(item_id = item.id, error = %e, "Provider reviews unavailable");
                Vec::new()
            }
        };

        Ok(aggregate(
            user_reviews,
            provider_reviews,
            self.settings.review_floor,
        ))
    }
}
