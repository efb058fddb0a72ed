use serde::Serialize;

use super::ContentKind;

/// A content genre (TMDB movie genre id).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: u32,
    pub name: String,
    /// URL slug, e.g. `scifi`.
    pub slug: String,
    /// Equivalent TV genre id when it differs or exists.
    #[serde(skip)]
    pub tv_id: Option<u32>,
}

impl Genre {
    /// Genre id to send to the provider for this kind.
    ///
    /// TV genres without a dedicated id fall back to the movie id.
    pub fn provider_id(&self, kind: ContentKind) -> u32 {
        match kind {
            ContentKind::Movie => self.id,
            ContentKind::Series => self.tv_id.unwrap_or(self.id),
        }
    }
}

/// Reference row inserted when the schema is created.
pub struct SeedGenre {
    pub id: u32,
    pub name: &'static str,
    pub slug: &'static str,
    pub tv_id: Option<u32>,
}

const fn seed(id: u32, name: &'static str, slug: &'static str, tv_id: Option<u32>) -> SeedGenre {
    SeedGenre {
        id,
        name,
        slug,
        tv_id,
    }
}

pub const SEED_GENRES: &[SeedGenre] = &[
    seed(28, "Action", "action", Some(10759)),
    seed(12, "Adventure", "adventure", Some(10759)),
    seed(16, "Animation", "animation", Some(16)),
    seed(35, "Comedy", "comedy", Some(35)),
    seed(80, "Crime", "crime", Some(80)),
    seed(99, "Documentary", "documentary", Some(99)),
    seed(18, "Drama", "drama", Some(18)),
    seed(10751, "Family", "family", Some(10751)),
    seed(14, "Fantasy", "fantasy", Some(10765)),
    seed(36, "History", "history", None),
    seed(27, "Horror", "horror", None),
    seed(10402, "Music", "music", None),
    seed(9648, "Mystery", "mystery", Some(9648)),
    seed(10749, "Romance", "romance", None),
    seed(878, "Science Fiction", "scifi", Some(10765)),
    seed(53, "Thriller", "thriller", None),
    seed(10752, "War", "war", Some(10768)),
    seed(37, "Western", "western", Some(37)),
];
