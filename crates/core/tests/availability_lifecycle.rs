//! Availability lifecycle integration tests.
//!
//! These tests follow a title from the provider's trending list, through the
//! background availability sync, into a user's by-platforms list and weekly
//! ranking.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use popflix_core::{
    testing::{fixtures, ManualClock, MockCatalogProvider, ProviderCall},
    AccountService, AvailabilitySync, CatalogCache, CatalogService, CatalogSettings, ContentKind,
    Dimension, PlatformStore, Registration, SqliteAccountStore, SqliteCatalogStore,
    SqlitePlatformStore, SqlitePool, SqliteReviewStore,
};

const NETFLIX: i64 = 1;
const HBO_MAX: i64 = 4;

/// Test helper wiring the catalog over a file-backed database.
struct TestHarness {
    provider: Arc<MockCatalogProvider>,
    catalog: Arc<CatalogService>,
    platforms: Arc<SqlitePlatformStore>,
    accounts: AccountService,
    _temp_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = Arc::new(
            SqlitePool::open(&temp_dir.path().join("test.db"), 2, Duration::from_secs(5))
                .expect("Failed to open pool"),
        );

        let provider = Arc::new(MockCatalogProvider::new());
        provider
            .set_trending(ContentKind::Movie, fixtures::provider_titles(5))
            .await;
        // Provider ids: Netflix 8, Disney+ 337, HBO Max 1899, Prime Video 9
        for (external_id, providers) in [
            (1, vec![8]),
            (2, vec![337]),
            (3, vec![8, 1899]),
            (4, vec![]),
            (5, vec![9]),
        ] {
            provider
                .set_watch_providers(ContentKind::Movie, external_id, providers)
                .await;
        }

        let platforms = Arc::new(SqlitePlatformStore::new(Arc::clone(&pool)));
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&provider) as Arc<dyn popflix_core::CatalogProvider>,
            Arc::new(CatalogCache::new(
                Duration::from_secs(300),
                16,
                Arc::new(ManualClock::new()),
            )),
            Arc::new(SqliteCatalogStore::new(Arc::clone(&pool))),
            Arc::clone(&platforms) as Arc<dyn PlatformStore>,
            Arc::new(SqliteReviewStore::new(Arc::clone(&pool))),
            CatalogSettings::default(),
        ));
        let accounts = AccountService::new(Arc::new(SqliteAccountStore::new(pool)));

        Self {
            provider,
            catalog,
            platforms,
            accounts,
            _temp_dir: temp_dir,
        }
    }

    fn register(&self, email: &str) -> i64 {
        self.accounts
            .register(&Registration {
                first_name: "Lucía".to_string(),
                last_name: "Fernández".to_string(),
                email: email.to_string(),
                phone: "+34 611 222 333".to_string(),
                password: "longenough".to_string(),
            })
            .expect("Failed to register user")
            .id
    }

    fn sync(&self) -> AvailabilitySync {
        AvailabilitySync::new(Arc::clone(&self.catalog), Duration::from_secs(600), 10)
    }
}

fn titles(items: &[popflix_core::CatalogItem]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

#[tokio::test]
async fn test_sync_feeds_user_platform_list() {
    let harness = TestHarness::new().await;
    let user_id = harness.register("lucia@example.com");
    harness
        .platforms
        .replace_selection(user_id, &[NETFLIX, HBO_MAX])
        .unwrap();

    // Nothing is known about availability before the first pass
    let slice = harness
        .catalog
        .slice(ContentKind::Movie, &Dimension::UserPlatforms(user_id), 1)
        .await
        .unwrap();
    assert!(slice.items.is_empty());
    assert_eq!(slice.total_pages, 0);

    assert_eq!(harness.sync().run_once().await, 5);

    let slice = harness
        .catalog
        .slice(ContentKind::Movie, &Dimension::UserPlatforms(user_id), 1)
        .await
        .unwrap();
    assert_eq!(titles(&slice.items), vec!["Title 1", "Title 3"]);
    assert_eq!(slice.total_pages, 1);

    let ranking = harness.catalog.weekly_ranking(user_id).unwrap();
    assert_eq!(titles(&ranking), vec!["Title 1", "Title 3"]);
}

#[tokio::test]
async fn test_checked_items_are_not_fetched_again() {
    let harness = TestHarness::new().await;
    let sync = harness.sync();

    assert_eq!(sync.run_once().await, 5);
    assert_eq!(sync.run_once().await, 0);

    let lookups = harness
        .provider
        .recorded_calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, ProviderCall::WatchProviders { .. }))
        .count();
    assert_eq!(lookups, 5);

    // An item page served after the sync reads the stored answer
    let item = harness
        .catalog
        .slice(ContentKind::Movie, &Dimension::Trending, 1)
        .await
        .unwrap()
        .items[2]
        .clone();
    let platforms = harness
        .catalog
        .item_platforms(ContentKind::Movie, item.id)
        .await
        .unwrap();
    let mut ids: Vec<i64> = platforms.iter().map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec![NETFLIX, HBO_MAX]);

    let lookups = harness
        .provider
        .recorded_calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, ProviderCall::WatchProviders { .. }))
        .count();
    assert_eq!(lookups, 5);
}

#[tokio::test]
async fn test_switching_platforms_changes_the_list() {
    let harness = TestHarness::new().await;
    let user_id = harness.register("lucia@example.com");
    harness.sync().run_once().await;

    harness.platforms.replace_selection(user_id, &[2]).unwrap();
    let slice = harness
        .catalog
        .slice(ContentKind::Movie, &Dimension::UserPlatforms(user_id), 1)
        .await
        .unwrap();
    assert_eq!(titles(&slice.items), vec!["Title 5"]);

    harness.platforms.replace_selection(user_id, &[]).unwrap();
    let slice = harness
        .catalog
        .slice(ContentKind::Movie, &Dimension::UserPlatforms(user_id), 1)
        .await
        .unwrap();
    assert!(slice.items.is_empty());
}
