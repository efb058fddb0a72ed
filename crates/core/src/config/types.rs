use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    4000
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Number of pooled SQLite connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// How long a request waits for a free connection before failing.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("popflix.db")
}

fn default_pool_size() -> usize {
    10
}

fn default_acquire_timeout() -> u64 {
    5
}

/// TMDB provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB API key (v3).
    pub api_key: String,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// Image base URL for posters/backdrops.
    #[serde(default = "default_tmdb_image_base_url")]
    pub image_base_url: String,
    /// Language sent with every request (e.g. "es-ES").
    #[serde(default = "default_language")]
    pub language: String,
    /// Region used to pick watch providers.
    #[serde(default = "default_region")]
    pub region: String,
    /// Request timeout in seconds.
    #[serde(default = "default_tmdb_timeout")]
    pub timeout_secs: u64,
    /// Provider pages fetched when a dimension is refreshed (20 titles each).
    /// The default of 1 makes every refresh a single remote call.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "es-ES".to_string()
}

fn default_region() -> String {
    "ES".to_string()
}

fn default_tmdb_timeout() -> u64 {
    30
}

fn default_max_pages() -> u32 {
    1
}

/// In-memory dimension cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
    /// Maximum number of cached dimensions before LRU eviction kicks in.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            capacity: default_capacity(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}

fn default_capacity() -> usize {
    256
}

/// Catalog paging and background sync configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Page size of the provider-backed dimensions (trending, top-rated, genre, search).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Page size of the by-platforms dimension.
    #[serde(default = "default_platform_page_size")]
    pub platform_page_size: usize,
    /// Reviews are padded with placeholders up to this count.
    #[serde(default = "default_review_floor")]
    pub review_floor: usize,
    /// Seconds between availability sync runs (0 disables the task).
    #[serde(default = "default_availability_sync_secs")]
    pub availability_sync_secs: u64,
    /// Items checked per availability sync run.
    #[serde(default = "default_availability_batch")]
    pub availability_batch: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            platform_page_size: default_platform_page_size(),
            review_floor: default_review_floor(),
            availability_sync_secs: default_availability_sync_secs(),
            availability_batch: default_availability_batch(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_platform_page_size() -> usize {
    30
}

fn default_review_floor() -> usize {
    3
}

fn default_availability_sync_secs() -> u64 {
    600
}

fn default_availability_batch() -> usize {
    40
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub tmdb: SanitizedTmdbConfig,
    pub cache: CacheConfig,
    pub catalog: CatalogConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub language: String,
    pub region: String,
    pub timeout_secs: u64,
    pub max_pages: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            tmdb: SanitizedTmdbConfig {
                base_url: config.tmdb.base_url.clone(),
                api_key_configured: !config.tmdb.api_key.is_empty(),
                language: config.tmdb.language.clone(),
                region: config.tmdb.region.clone(),
                timeout_secs: config.tmdb.timeout_secs,
                max_pages: config.tmdb.max_pages,
            },
            cache: config.cache.clone(),
            catalog: config.catalog.clone(),
        }
    }
}
