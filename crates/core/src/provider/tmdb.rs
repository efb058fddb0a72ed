//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{
    CatalogProvider, ProviderDetails, ProviderError, ProviderPage, ProviderReview, ProviderTitle,
};
use crate::catalog::ContentKind;
use crate::config::TmdbConfig;
use crate::metrics::{PROVIDER_REQUESTS, PROVIDER_REQUEST_DURATION};

const POSTER_SIZE: &str = "w342";
const BACKDROP_SIZE: &str = "w1280";

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    image_base_url: String,
    language: String,
    region: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: &TmdbConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            region: config.region.clone(),
        })
    }

    /// GET a TMDB endpoint, recording request metrics.
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let timer = PROVIDER_REQUEST_DURATION
            .with_label_values(&[operation])
            .start_timer();
        let result = self.send(path, params).await;
        timer.observe_duration();

        let status = if result.is_ok() { "success" } else { "error" };
        PROVIDER_REQUESTS
            .with_label_values(&[operation, status])
            .inc();

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        debug!("TMDB request: path='{}', params={:?}", path, params);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(ProviderError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(ProviderError::NotFound(path.to_string()));
        }
        if status == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse {} response: {}", path, e))
        })
    }

    async fn list(
        &self,
        operation: &'static str,
        path: &str,
        mut params: Vec<(&str, String)>,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        params.push(("page", page.to_string()));
        let response: TmdbListResponse = self.get_json(operation, path, &params).await?;
        Ok(self.convert_page(response))
    }

    fn convert_page(&self, response: TmdbListResponse) -> ProviderPage {
        ProviderPage {
            items: response
                .results
                .into_iter()
                .map(|r| self.convert_title(r))
                .collect(),
            page: response.page,
            total_pages: response.total_pages,
        }
    }

    fn convert_title(&self, r: TmdbListResult) -> ProviderTitle {
        ProviderTitle {
            external_id: r.id,
            title: r.title.or(r.name).unwrap_or_default(),
            overview: r.overview.unwrap_or_default(),
            poster_url: self.image_url(POSTER_SIZE, r.poster_path),
            backdrop_url: self.image_url(BACKDROP_SIZE, r.backdrop_path),
            release_date: non_empty(r.release_date.or(r.first_air_date)),
            vote_average: r.vote_average.unwrap_or_default(),
            popularity: r.popularity.unwrap_or_default(),
            genre_ids: r.genre_ids,
        }
    }

    fn image_url(&self, size: &str, path: Option<String>) -> Option<String> {
        non_empty(path).map(|p| format!("{}/{}{}", self.image_base_url, size, p))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[async_trait]
impl CatalogProvider for TmdbClient {
    async fn trending(&self, kind: ContentKind, page: u32) -> Result<ProviderPage, ProviderError> {
        let path = format!("/trending/{}/week", kind.provider_path());
        self.list("trending", &path, Vec::new(), page).await
    }

    async fn top_rated(
        &self,
        kind: ContentKind,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        let path = format!("/{}/top_rated", kind.provider_path());
        self.list("top_rated", &path, Vec::new(), page).await
    }

    async fn discover_by_genre(
        &self,
        kind: ContentKind,
        genre_id: u32,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        let path = format!("/discover/{}", kind.provider_path());
        let params = vec![
            ("with_genres", genre_id.to_string()),
            ("sort_by", "popularity.desc".to_string()),
        ];
        self.list("discover", &path, params, page).await
    }

    async fn search(
        &self,
        kind: ContentKind,
        query: &str,
        page: u32,
    ) -> Result<ProviderPage, ProviderError> {
        let path = format!("/search/{}", kind.provider_path());
        let params = vec![("query", query.to_string())];
        self.list("search", &path, params, page).await
    }

    async fn details(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<ProviderDetails, ProviderError> {
        let path = format!("/{}/{}", kind.provider_path(), external_id);
        let details: TmdbDetailsResponse = self.get_json("details", &path, &[]).await?;
        Ok(details.into())
    }

    async fn reviews(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<Vec<ProviderReview>, ProviderError> {
        let path = format!("/{}/{}/reviews", kind.provider_path(), external_id);
        let response: TmdbReviewsResponse = self.get_json("reviews", &path, &[]).await?;
        Ok(response.results.into_iter().map(Into::into).collect())
    }

    async fn watch_providers(
        &self,
        kind: ContentKind,
        external_id: u32,
    ) -> Result<Vec<u32>, ProviderError> {
        let path = format!("/{}/{}/watch/providers", kind.provider_path(), external_id);
        let response: TmdbWatchProvidersResponse =
            self.get_json("watch_providers", &path, &[]).await?;
        Ok(response.provider_ids(&self.region))
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    results: Vec<TmdbListResult>,
    #[serde(default)]
    total_pages: u32,
}

fn first_page() -> u32 {
    1
}

/// Movie and TV list entries share one shape; movies fill `title` and
/// `release_date`, series fill `name` and `first_air_date`.
#[derive(Debug, Deserialize)]
struct TmdbListResult {
    id: u32,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f32>,
    popularity: Option<f64>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbDetailsResponse {
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    tagline: Option<String>,
    status: Option<String>,
    homepage: Option<String>,
    budget: Option<u64>,
    revenue: Option<u64>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    vote_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbReviewsResponse {
    #[serde(default)]
    results: Vec<TmdbReviewResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbReviewResult {
    id: String,
    author: String,
    author_details: Option<TmdbAuthorDetails>,
    content: String,
    created_at: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbAuthorDetails {
    rating: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct TmdbWatchProvidersResponse {
    #[serde(default)]
    results: HashMap<String, TmdbRegionProviders>,
}

#[derive(Debug, Default, Deserialize)]
struct TmdbRegionProviders {
    #[serde(default)]
    flatrate: Vec<TmdbProviderEntry>,
    #[serde(default)]
    rent: Vec<TmdbProviderEntry>,
    #[serde(default)]
    buy: Vec<TmdbProviderEntry>,
}

#[derive(Debug, Deserialize)]
struct TmdbProviderEntry {
    provider_id: u32,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<TmdbDetailsResponse> for ProviderDetails {
    fn from(d: TmdbDetailsResponse) -> Self {
        Self {
            runtime: d.runtime.or_else(|| d.episode_run_time.first().copied()),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            tagline: non_empty(d.tagline),
            status: non_empty(d.status),
            homepage: non_empty(d.homepage),
            budget: d.budget.filter(|b| *b > 0),
            revenue: d.revenue.filter(|r| *r > 0),
            number_of_seasons: d.number_of_seasons,
            number_of_episodes: d.number_of_episodes,
            vote_count: d.vote_count,
        }
    }
}

impl From<TmdbReviewResult> for ProviderReview {
    fn from(r: TmdbReviewResult) -> Self {
        Self {
            id: r.id,
            author: r.author,
            rating: r.author_details.and_then(|a| a.rating),
            content: r.content,
            created_at: r.created_at,
            url: r.url,
        }
    }
}

impl TmdbWatchProvidersResponse {
    /// Subscription, rent and buy offers for a region, first occurrence wins.
    fn provider_ids(mut self, region: &str) -> Vec<u32> {
        let offers = self.results.remove(region).unwrap_or_default();

        let mut ids: Vec<u32> = Vec::new();
        for entry in offers
            .flatrate
            .iter()
            .chain(&offers.rent)
            .chain(&offers.buy)
        {
            if !ids.contains(&entry.provider_id) {
                ids.push(entry.provider_id);
            }
        }
        ids
    }
}
