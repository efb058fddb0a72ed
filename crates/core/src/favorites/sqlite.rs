use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{Favorite, FavoriteStore};
use crate::catalog::{item_from_row, ITEM_COLUMNS};
use crate::db::{format_timestamp, parse_timestamp, SqlitePool, StoreError};

/// SQLite-backed favorite store.
pub struct SqliteFavoriteStore {
    pool: Arc<SqlitePool>,
}

impl SqliteFavoriteStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

fn exists(conn: &Connection, sql: &str, id: i64) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(sql, params![id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

impl FavoriteStore for SqliteFavoriteStore {
    fn add(&self, user_id: i64, item_id: i64, added_at: DateTime<Utc>) -> Result<(), StoreError> {
        let conn = self.pool.get()?;

        if !exists(&conn, "SELECT id FROM users WHERE id = ?1", user_id)? {
            return Err(StoreError::NotFound(format!("User {}", user_id)));
        }
        if !exists(&conn, "SELECT id FROM catalog_items WHERE id = ?1", item_id)? {
            return Err(StoreError::NotFound(format!("Item {}", item_id)));
        }

        conn.execute(
            "INSERT INTO favorites (user_id, item_id, added_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, item_id) DO UPDATE SET added_at = excluded.added_at",
            params![user_id, item_id, format_timestamp(added_at)],
        )?;
        Ok(())
    }

    fn remove(&self, user_id: i64, item_id: i64) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND item_id = ?2",
            params![user_id, item_id],
        )?;
        Ok(deleted > 0)
    }

    fn list(&self, user_id: i64) -> Result<Vec<Favorite>, StoreError> {
        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT {}, f.added_at
             FROM favorites f
             JOIN catalog_items c ON c.id = f.item_id
             WHERE f.user_id = ?1
             ORDER BY f.added_at DESC, c.id DESC",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let favorites = stmt
            .query_map(params![user_id], |row| {
                let added_at: String = row.get(11)?;
                Ok(Favorite {
                    item: item_from_row(row)?,
                    added_at: parse_timestamp(&added_at),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }
}
