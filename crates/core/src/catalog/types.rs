//! Types for the content catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::provider::ProviderDetails;

/// Movie or series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Value stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }

    /// Path segment used by the provider API (and as cache key prefix).
    pub fn provider_path(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "tv",
        }
    }

    /// JSON key wrapping list responses.
    pub fn envelope_key(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movies",
            ContentKind::Series => "series",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentKind::Movie),
            "series" => Ok(ContentKind::Series),
            other => Err(format!("unknown content kind: {}", other)),
        }
    }
}

/// A movie or series persisted from the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Local id (stable across provider refreshes).
    pub id: i64,
    /// Provider id.
    pub external_id: u32,
    pub kind: ContentKind,
    pub title: String,
    pub description: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date: Option<String>,
    /// Average rating (0-10).
    pub rating: f32,
    pub popularity: f64,
    pub genre_ids: Vec<u32>,
}

/// A stored item together with the platforms it is available on.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableItem {
    pub item: CatalogItem,
    pub platform_ids: Vec<i64>,
}

/// Catalog item merged with the provider's detail fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(flatten)]
    pub details: ProviderDetails,
}

/// What a list request is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dimension {
    Trending,
    TopRated,
    /// Provider genre id (the TV id for series).
    Genre(u32),
    Search(String),
    /// Items available on the user's selected platforms.
    UserPlatforms(i64),
}

impl Dimension {
    /// Search dimension with the term normalized the way it is cached.
    pub fn search(term: &str) -> Self {
        Dimension::Search(term.trim().to_lowercase())
    }

    /// Cache key for this dimension, e.g. `movie:genre:28` or
    /// `tv:search:batman`. `None` for dimensions served from the store.
    pub fn cache_key(&self, kind: ContentKind) -> Option<String> {
        let prefix = kind.provider_path();
        match self {
            Dimension::Trending => Some(format!("{}:trending", prefix)),
            Dimension::TopRated => Some(format!("{}:top-rated", prefix)),
            Dimension::Genre(id) => Some(format!("{}:genre:{}", prefix, id)),
            Dimension::Search(term) => Some(format!("{}:search:{}", prefix, term)),
            Dimension::UserPlatforms(_) => None,
        }
    }
}

/// One page of a dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub items: Vec<CatalogItem>,
    /// 1-based page number that was requested.
    pub page: u32,
    pub total_pages: u32,
    /// Size of the whole result set before paging.
    pub total_items: usize,
}

impl Slice {
    pub fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            total_pages: 0,
            total_items: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(
            Dimension::Trending.cache_key(ContentKind::Movie).as_deref(),
            Some("movie:trending")
        );
        assert_eq!(
            Dimension::Genre(28).cache_key(ContentKind::Movie).as_deref(),
            Some("movie:genre:28")
        );
        assert_eq!(
            Dimension::search("  Batman ")
                .cache_key(ContentKind::Series)
                .as_deref(),
            Some("tv:search:batman")
        );
        assert!(Dimension::UserPlatforms(7)
            .cache_key(ContentKind::Movie)
            .is_none());
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [ContentKind::Movie, ContentKind::Series] {
            assert_eq!(kind.as_str().parse::<ContentKind>().unwrap(), kind);
        }
        assert!("tv".parse::<ContentKind>().is_err());
        assert_eq!(ContentKind::Series.envelope_key(), "series");
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = CatalogItem {
            id: 1,
            external_id: 603,
            kind: ContentKind::Movie,
            title: "The Matrix".to_string(),
            description: String::new(),
            poster_url: None,
            backdrop_url: None,
            release_date: Some("1999-03-30".to_string()),
            rating: 8.2,
            popularity: 10.0,
            genre_ids: vec![28],
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["externalId"], 603);
        assert_eq!(json["kind"], "movie");
        assert_eq!(json["releaseDate"], "1999-03-30");
        assert_eq!(json["genreIds"][0], 28);
    }
}
