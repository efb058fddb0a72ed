//! Testing utilities: a mock catalog provider, a manual clock and fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use popflix_core::testing::{MockCatalogProvider, ManualClock, fixtures};
//!
//! let provider = MockCatalogProvider::new();
//! provider.set_trending(ContentKind::Movie, fixtures::provider_titles(45)).await;
//!
//! let clock = ManualClock::new();
//! clock.advance(Duration::from_secs(301));
//! ```

mod mock_provider;

pub use crate::cache::ManualClock;
pub use mock_provider::{MockCatalogProvider, ProviderCall, MOCK_PAGE_SIZE};

/// Test fixtures and helper functions.
pub mod fixtures {
    use rusqlite::params;

    use crate::catalog::{CatalogItem, ContentKind};
    use crate::db::SqlitePool;
    use crate::provider::{ProviderReview, ProviderTitle};

    /// Create a stored movie with reasonable defaults.
    pub fn catalog_item(id: i64, external_id: u32, title: &str) -> CatalogItem {
        CatalogItem {
            id,
            external_id,
            kind: ContentKind::Movie,
            title: title.to_string(),
            description: format!("{} overview", title),
            poster_url: Some(format!("https://image.tmdb.org/t/p/w342/{}.jpg", external_id)),
            backdrop_url: None,
            release_date: Some("2020-01-01".to_string()),
            rating: 7.5,
            popularity: 100.0,
            genre_ids: vec![28],
        }
    }

    /// `count` stored movies with ids and external ids `1..=count`.
    pub fn catalog_items(count: usize) -> Vec<CatalogItem> {
        (1..=count)
            .map(|i| catalog_item(i as i64, i as u32, &format!("Movie {}", i)))
            .collect()
    }

    /// Create a provider listing entry.
    pub fn provider_title(external_id: u32, title: &str, popularity: f64) -> ProviderTitle {
        ProviderTitle {
            external_id,
            title: title.to_string(),
            overview: format!("{} overview", title),
            poster_url: Some(format!("https://image.tmdb.org/t/p/w342/{}.jpg", external_id)),
            backdrop_url: Some(format!(
                "https://image.tmdb.org/t/p/w1280/{}.jpg",
                external_id
            )),
            release_date: Some("2021-06-15".to_string()),
            vote_average: 7.0,
            popularity,
            genre_ids: vec![28, 12],
        }
    }

    /// `count` listing entries with external ids `1..=count`; lower ids are
    /// more popular.
    pub fn provider_titles(count: u32) -> Vec<ProviderTitle> {
        (1..=count)
            .map(|i| provider_title(i, &format!("Title {}", i), 1000.0 - i as f64))
            .collect()
    }

    pub fn provider_review(id: &str, author: &str) -> ProviderReview {
        ProviderReview {
            id: id.to_string(),
            author: author.to_string(),
            rating: Some(8.0),
            content: format!("Review by {}", author),
            created_at: Some("2024-01-15T10:00:00.000Z".to_string()),
            url: Some(format!("https://www.themoviedb.org/review/{}", id)),
        }
    }

    /// Insert a user named "Test User" directly and return its id.
    pub fn insert_user(pool: &SqlitePool, email: &str) -> i64 {
        let conn = pool.get().expect("pool connection");
        conn.execute(
            "INSERT INTO users (first_name, last_name, email, phone, password_hash, created_at)
             VALUES ('Test', 'User', ?1, '+34600000000', 'x', '2024-01-01T00:00:00.000000Z')",
            params![email],
        )
        .expect("insert test user");
        conn.last_insert_rowid()
    }
}
