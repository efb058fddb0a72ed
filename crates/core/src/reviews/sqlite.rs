use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{NewReview, Review, ReviewStore};
use crate::db::{format_timestamp, parse_timestamp, SqlitePool, StoreError};

const REVIEW_QUERY: &str = "SELECT r.id, r.user_id, r.item_id,
        u.first_name || ' ' || u.last_name,
        r.rating, r.content, r.created_at, r.updated_at
     FROM reviews r
     JOIN users u ON u.id = r.user_id";

/// SQLite-backed review store.
pub struct SqliteReviewStore {
    pool: Arc<SqlitePool>,
}

impl SqliteReviewStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    fn row_to_review(row: &Row) -> rusqlite::Result<Review> {
        let created_at: String = row.get(6)?;
        let updated_at: String = row.get(7)?;
        Ok(Review {
            id: row.get(0)?,
            user_id: row.get(1)?,
            item_id: row.get(2)?,
            author: row.get(3)?,
            rating: row.get(4)?,
            content: row.get(5)?,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }
}

impl ReviewStore for SqliteReviewStore {
    fn upsert(&self, review: &NewReview, now: DateTime<Utc>) -> Result<Review, StoreError> {
        let conn = self.pool.get()?;

        let user: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE id = ?1",
                params![review.user_id],
                |row| row.get(0),
            )
            .optional()?;
        if user.is_none() {
            return Err(StoreError::NotFound(format!("User {}", review.user_id)));
        }
        let item: Option<i64> = conn
            .query_row(
                "SELECT id FROM catalog_items WHERE id = ?1",
                params![review.item_id],
                |row| row.get(0),
            )
            .optional()?;
        if item.is_none() {
            return Err(StoreError::NotFound(format!("Item {}", review.item_id)));
        }

        let now = format_timestamp(now);
        let id: i64 = conn.query_row(
            "INSERT INTO reviews (user_id, item_id, rating, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(user_id, item_id) DO UPDATE SET
                rating = excluded.rating,
                content = excluded.content,
                updated_at = excluded.updated_at
             RETURNING id",
            params![review.user_id, review.item_id, review.rating, review.content, now],
            |row| row.get(0),
        )?;

        let stored = conn.query_row(
            &format!("{} WHERE r.id = ?1", REVIEW_QUERY),
            params![id],
            Self::row_to_review,
        )?;
        Ok(stored)
    }

    fn list_for_item(&self, item_id: i64) -> Result<Vec<Review>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE r.item_id = ?1 ORDER BY r.created_at DESC, r.id DESC",
            REVIEW_QUERY
        ))?;
        let reviews = stmt
            .query_map(params![item_id], Self::row_to_review)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }
}
