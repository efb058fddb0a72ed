//! Types returned by catalog providers.

use serde::{Deserialize, Serialize};

/// A movie or series as listed by the provider (search, trending, discover).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderTitle {
    /// Provider ID (TMDB id).
    pub external_id: u32,
    /// Localized title (`title` for movies, `name` for series).
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Absolute poster URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Absolute backdrop URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
    /// Release date for movies, first air date for series (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Average vote (0-10).
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub popularity: f64,
    /// Provider genre ids (TV ids for series).
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// One page of a provider listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderPage {
    pub items: Vec<ProviderTitle>,
    /// 1-based page number.
    pub page: u32,
    pub total_pages: u32,
}

/// Extra metadata only available from the provider's details endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_seasons: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_episodes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u32>,
}

/// A review published on the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderReview {
    pub id: String,
    pub author: String,
    /// Author's rating (0-10), when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    pub content: String,
    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
