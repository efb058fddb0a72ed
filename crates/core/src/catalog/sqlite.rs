//! SQLite-backed catalog store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{AvailableItem, CatalogItem, CatalogStore, ContentKind, Genre};
use crate::db::{format_timestamp, SqlitePool, StoreError};
use crate::provider::ProviderTitle;

pub(crate) const ITEM_COLUMNS: &str = "c.id, c.external_id, c.kind, c.title, c.description, c.poster_url,
     c.backdrop_url, c.release_date, c.rating, c.popularity,
     (SELECT GROUP_CONCAT(g.genre_id) FROM item_genres g WHERE g.item_id = c.id)";

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    pool: Arc<SqlitePool>,
}

impl SqliteCatalogStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    fn row_to_genre(row: &Row) -> rusqlite::Result<Genre> {
        Ok(Genre {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            tv_id: row.get(3)?,
        })
    }
}

/// Build a [`CatalogItem`] from the first columns of a row selecting
/// [`ITEM_COLUMNS`].
pub(crate) fn item_from_row(row: &Row) -> rusqlite::Result<CatalogItem> {
    let kind: String = row.get(2)?;
    let kind = kind.parse::<ContentKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
    })?;
    let genres: Option<String> = row.get(10)?;

    Ok(CatalogItem {
        id: row.get(0)?,
        external_id: row.get(1)?,
        kind,
        title: row.get(3)?,
        description: row.get(4)?,
        poster_url: row.get(5)?,
        backdrop_url: row.get(6)?,
        release_date: row.get(7)?,
        rating: row.get::<_, f64>(8)? as f32,
        popularity: row.get(9)?,
        genre_ids: parse_id_list(genres.as_deref()),
    })
}

/// Parse a `GROUP_CONCAT` id list, sorted ascending.
fn parse_id_list<T: std::str::FromStr + Ord>(list: Option<&str>) -> Vec<T> {
    let mut ids: Vec<T> = list
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    ids.sort();
    ids
}

impl CatalogStore for SqliteCatalogStore {
    fn upsert_items(
        &self,
        kind: ContentKind,
        titles: &[ProviderTitle],
    ) -> Result<Vec<CatalogItem>, StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let now = format_timestamp(Utc::now());
        let mut items = Vec::with_capacity(titles.len());

        {
            let mut upsert = tx.prepare_cached(
                "INSERT INTO catalog_items
                    (kind, external_id, title, description, poster_url, backdrop_url,
                     release_date, rating, popularity, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(kind, external_id) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    poster_url = excluded.poster_url,
                    backdrop_url = excluded.backdrop_url,
                    release_date = excluded.release_date,
                    rating = excluded.rating,
                    popularity = excluded.popularity,
                    updated_at = excluded.updated_at
                 RETURNING id",
            )?;
            let mut clear_genres = tx.prepare_cached("DELETE FROM item_genres WHERE item_id = ?1")?;
            let mut add_genre = tx.prepare_cached(
                "INSERT OR IGNORE INTO item_genres (item_id, genre_id) VALUES (?1, ?2)",
            )?;

            for title in titles {
                let id: i64 = upsert.query_row(
                    params![
                        kind.as_str(),
                        title.external_id,
                        title.title,
                        title.overview,
                        title.poster_url,
                        title.backdrop_url,
                        title.release_date,
                        title.vote_average as f64,
                        title.popularity,
                        now,
                    ],
                    |row| row.get(0),
                )?;

                clear_genres.execute(params![id])?;
                for genre_id in &title.genre_ids {
                    add_genre.execute(params![id, genre_id])?;
                }

                let mut genre_ids = title.genre_ids.clone();
                genre_ids.sort_unstable();
                genre_ids.dedup();

                items.push(CatalogItem {
                    id,
                    external_id: title.external_id,
                    kind,
                    title: title.title.clone(),
                    description: title.overview.clone(),
                    poster_url: title.poster_url.clone(),
                    backdrop_url: title.backdrop_url.clone(),
                    release_date: title.release_date.clone(),
                    rating: title.vote_average,
                    popularity: title.popularity,
                    genre_ids,
                });
            }
        }

        tx.commit()?;
        Ok(items)
    }

    fn get_item(&self, id: i64) -> Result<Option<CatalogItem>, StoreError> {
        let conn = self.pool.get()?;
        let sql = format!("SELECT {} FROM catalog_items c WHERE c.id = ?1", ITEM_COLUMNS);
        let item = conn
            .query_row(&sql, params![id], item_from_row)
            .optional()?;
        Ok(item)
    }

    fn count_items(&self) -> Result<u64, StoreError> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM catalog_items", [], |row| {
            row.get(0)
        })?;
        Ok(count as u64)
    }

    fn genres(&self) -> Result<Vec<Genre>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, name, slug, tv_id FROM genres ORDER BY name")?;
        let genres = stmt
            .query_map([], Self::row_to_genre)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn find_genre(&self, key: &str) -> Result<Option<Genre>, StoreError> {
        let conn = self.pool.get()?;
        let key = key.trim();

        if let Ok(id) = key.parse::<u32>() {
            let genre = conn
                .query_row(
                    "SELECT id, name, slug, tv_id FROM genres
                     WHERE id = ?1 OR tv_id = ?1
                     ORDER BY (id = ?1) DESC, id
                     LIMIT 1",
                    params![id],
                    Self::row_to_genre,
                )
                .optional()?;
            return Ok(genre);
        }

        let genre = conn
            .query_row(
                "SELECT id, name, slug, tv_id FROM genres
                 WHERE slug = lower(?1) OR lower(name) = lower(?1)
                 LIMIT 1",
                params![key],
                Self::row_to_genre,
            )
            .optional()?;
        Ok(genre)
    }

    fn available_items(&self, kind: ContentKind) -> Result<Vec<AvailableItem>, StoreError> {
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {},
                (SELECT GROUP_CONCAT(p.platform_id) FROM item_platforms p WHERE p.item_id = c.id)
             FROM catalog_items c
             WHERE c.kind = ?1
               AND EXISTS (SELECT 1 FROM item_platforms p WHERE p.item_id = c.id)
             ORDER BY c.popularity DESC, c.id ASC",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![kind.as_str()], |row| {
                let platforms: Option<String> = row.get(11)?;
                Ok(AvailableItem {
                    item: item_from_row(row)?,
                    platform_ids: parse_id_list(platforms.as_deref()),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn item_platform_ids(&self, item_id: i64) -> Result<Option<Vec<i64>>, StoreError> {
        let conn = self.pool.get()?;
        let checked: Option<String> = conn
            .query_row(
                "SELECT checked_at FROM availability_checks WHERE item_id = ?1",
                params![item_id],
                |row| row.get(0),
            )
            .optional()?;
        if checked.is_none() {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT platform_id FROM item_platforms WHERE item_id = ?1 ORDER BY platform_id",
        )?;
        let ids = stmt
            .query_map(params![item_id], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(Some(ids))
    }

    fn record_availability(
        &self,
        item_id: i64,
        platform_ids: &[i64],
        checked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM item_platforms WHERE item_id = ?1",
            params![item_id],
        )?;
        {
            let mut insert = tx.prepare_cached(
                "INSERT OR IGNORE INTO item_platforms (item_id, platform_id) VALUES (?1, ?2)",
            )?;
            for platform_id in platform_ids {
                insert.execute(params![item_id, platform_id])?;
            }
        }
        tx.execute(
            "INSERT INTO availability_checks (item_id, checked_at) VALUES (?1, ?2)
             ON CONFLICT(item_id) DO UPDATE SET checked_at = excluded.checked_at",
            params![item_id, format_timestamp(checked_at)],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn unchecked_items(
        &self,
        kind: ContentKind,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, StoreError> {
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {} FROM catalog_items c
             WHERE c.kind = ?1
               AND NOT EXISTS (SELECT 1 FROM availability_checks a WHERE a.item_id = c.id)
             ORDER BY c.popularity DESC, c.id ASC
             LIMIT ?2",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![kind.as_str(), limit as i64], item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}
