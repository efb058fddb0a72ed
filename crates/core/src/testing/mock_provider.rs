//! Mock catalog provider for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::ContentKind;
use crate::provider::{
    CatalogProvider, ProviderDetails, ProviderError, ProviderPage, ProviderReview, ProviderTitle,
};

/// Titles per page served by the mock, mirroring TMDB.
pub const MOCK_PAGE_SIZE: usize = 20;

/// A recorded provider call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Trending { kind: ContentKind, page: u32 },
    TopRated { kind: ContentKind, page: u32 },
    Discover { kind: ContentKind, genre_id: u32, page: u32 },
    Search { kind: ContentKind, query: String, page: u32 },
    Details { kind: ContentKind, external_id: u32 },
    Reviews { kind: ContentKind, external_id: u32 },
    WatchProviders { kind: ContentKind, external_id: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Listing {
    Trending(ContentKind),
    TopRated(ContentKind),
    Genre(ContentKind, u32),
}

impl Listing {
    fn kind(&self) -> ContentKind {
        match self {
            Listing::Trending(kind) | Listing::TopRated(kind) | Listing::Genre(kind, _) => *kind,
        }
    }
}

/// Mock implementation of the CatalogProvider trait.
///
/// Listings are served in pages of [`MOCK_PAGE_SIZE`]. Search matches titles
/// of the requested kind across every configured listing. Unknown details
/// fail with `NotFound`; unknown reviews and watch providers are empty.
///
/// # Example
///
/// ```rust,ignore
/// use popflix_core::testing::{MockCatalogProvider, fixtures};
///
/// let provider = MockCatalogProvider::new();
/// provider.set_trending(ContentKind::Movie, fixtures::provider_titles(30)).await;
///
/// let page = provider.trending(ContentKind::Movie, 2).await?;
/// assert_eq!(page.items.len(), 10);
/// ```
#[derive(Debug)]
pub struct MockCatalogProvider {
    listings: Arc<RwLock<HashMap<Listing, Vec<ProviderTitle>>>>,
    details: Arc<RwLock<HashMap<(ContentKind, u32), ProviderDetails>>>,
    reviews: Arc<RwLock<HashMap<(ContentKind, u32), Vec<ProviderReview>>>>,
    watch_providers: Arc<RwLock<HashMap<(ContentKind, u32), Vec<u32>>>>,
    calls: Arc<RwLock<Vec<ProviderCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ProviderError>>>,
}

impl Default for MockCatalogProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogProvider {
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            reviews: Arc::new(RwLock::new(HashMap::new())),
            watch_providers: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    pub async fn set_trending(&self, kind: ContentKind, titles: Vec<ProviderTitle>) {
        self.listings
            .write()
            .await
            .insert(Listing::Trending(kind), titles);
    }

    pub async fn set_top_rated(&self, kind: ContentKind, titles: Vec<ProviderTitle>) {
        self.listings
            .write()
            .await
            .insert(Listing::TopRated(kind), titles);
    }

    pub async fn set_genre(&self, kind: ContentKind, genre_id: u32, titles: Vec<ProviderTitle>) {
        self.listings
            .write()
            .await
            .insert(Listing::Genre(kind, genre_id), titles);
    }

    pub async fn set_details(&self, kind: ContentKind, external_id: u32, details: ProviderDetails) {
        self.details
            .write()
            .await
            .insert((kind, external_id), details);
    }

    pub async fn set_reviews(
        &self,
        kind: ContentKind,
        external_id: u32,
        reviews: Vec<ProviderReview>,
    ) {
        self.reviews
            .write()
            .await
            .insert((kind, external_id), reviews);
    }

    pub async fn set_watch_providers(&self, kind: ContentKind, external_id: u32, ids: Vec<u32>) {
        self.watch_providers
            .write()
            .await
            .insert((kind, external_id), ids);
    }

    /// Make the next operation fail with the given error.
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    pub async fn recorded_calls(&self) -> Vec<ProviderCall> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn record(&self, call: ProviderCall) -> Result<(), ProviderError> {
        self.calls.write().await.push(call);
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn listing_page(&self, listing: &Listing, page: u32) -> ProviderPage {
        let listings = self.listings.read().await;
        let titles = listings.get(listing).map(Vec::as_slice).unwrap_or(&[]);
        page_of(titles, page)
    }
}

fn page_of(titles: &[ProviderTitle], page: u32) -> ProviderPage {
    let total_pages = titles.len().div_ceil(MOCK_PAGE_SIZE) as u32;
    let start = (page.max(1) as usize - 1) * MOCK_PAGE_SIZE;
    let items = titles
        .iter()
        .skip(start)
        .take(MOCK_PAGE_SIZE)
        .cloned()
        .collect();
    ProviderPage {
        items,
        page,
        total_pages,
    }
}

#[async_trait]
impl CatalogProvider for MockCatalogProvider {
    async fn trending(&self, kind: ContentKind, page: u32) -> Result<ProviderPage, ProviderError> {
        self.record(ProviderCall::Trending { kind, page }).await?;
        Ok(self.listing_page(&Listing::Trending(kind), page).await)
    }

    async fn top_rated(&self, kind: ContentKind, page: u32) -> Result<ProviderPage, ProviderError> {
        self.record(ProviderCall::TopRated { kind, page }).await?;
        Ok(self.listing_page(&Listing::TopRated(kind), page).await)
    }

    async fn discover_by_genre(
        &self,
        kind: ContentKind,
        genre_id: u32,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        self.record(ProviderCall::Discover {
            kind,
            genre_id,
            page,
        })
        .await?;
        Ok(self.listing_page(&Listing::Genre(kind, genre_id), page).await)
    }

    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        self.record(ProviderCall::Search {
            kind,
            query: query.to_string(),
            page,
        })
        .await?;

        let needle = query.to_lowercase();
        let listings = self.listings.read().await;
        let mut seen = HashSet::new();
        let mut matches: Vec<ProviderTitle> = listings
            .iter()
            .filter(|(listing, _)| listing.kind() == kind)
            .flat_map(|(_, titles)| titles.iter())
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .filter(|t| seen.insert(t.external_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

        Ok(page_of(&matches, page))
    }

    async fn details(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<ProviderDetails, ProviderError> {
        self.record(ProviderCall::Details { kind, external_id })
            .await?;
        self.details
            .read()
            .await
            .get(&(kind, external_id))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("{} {}", kind, external_id)))
    }

    async fn reviews(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<Vec<ProviderReview>, ProviderError> {
        self.record(ProviderCall::Reviews { kind, external_id })
            .await?;
        Ok(self
            .reviews
            .read()
            .await
            .get(&(kind, external_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn watch_providers(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<Vec<u32>, ProviderError> {
        self.record(ProviderCall::WatchProviders { kind, external_id })
            .await?;
        Ok(self
            .watch_providers
            .read()
            .await
            .get(&(kind, external_id))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::provider_titles;

    #[tokio::test]
    async fn test_pages_listing() {
        let provider = MockCatalogProvider::new();
        provider
            .set_trending(ContentKind::Movie, provider_titles(30))
            .await;

        let page = provider.trending(ContentKind::Movie, 2).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].external_id, 21);

        let empty = provider.trending(ContentKind::Series, 1).await.unwrap();
        assert!(empty.items.is_empty());
        assert_eq!(empty.total_pages, 0);
    }

    #[tokio::test]
    async fn test_next_error_is_one_shot() {
        let provider = MockCatalogProvider::new();
        provider
            .set_next_error(ProviderError::RateLimitExceeded)
            .await;

        assert!(matches!(
            provider.top_rated(ContentKind::Movie, 1).await,
            Err(ProviderError::RateLimitExceeded)
        ));
        assert!(provider.top_rated(ContentKind::Movie, 1).await.is_ok());
        assert_eq!(provider.call_count().await, 2);
    }
}
