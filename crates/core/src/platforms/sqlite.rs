use std::collections::HashSet;
use std::sync::Arc;

use rusqlite::{params, OptionalExtension, Row};

use super::{Platform, PlatformStore, UserPlatform};
use crate::db::{SqlitePool, StoreError};

/// SQLite-backed platform store.
pub struct SqlitePlatformStore {
    pool: Arc<SqlitePool>,
}

impl SqlitePlatformStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    fn row_to_platform(row: &Row) -> rusqlite::Result<Platform> {
        Ok(Platform {
            id: row.get(0)?,
            name: row.get(1)?,
            icon: row.get(2)?,
            color: row.get(3)?,
            provider_id: row.get(4)?,
        })
    }
}

impl PlatformStore for SqlitePlatformStore {
    fn list(&self) -> Result<Vec<Platform>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, icon, color, provider_id FROM platforms ORDER BY name",
        )?;
        let platforms = stmt
            .query_map([], Self::row_to_platform)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(platforms)
    }

    fn user_platforms(&self, user_id: i64) -> Result<Vec<UserPlatform>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.icon, p.color, p.provider_id,
                    COALESCE(up.selected, 0)
             FROM platforms p
             LEFT JOIN user_platforms up ON up.platform_id = p.id AND up.user_id = ?1
             ORDER BY p.name",
        )?;
        let platforms = stmt
            .query_map(params![user_id], |row| {
                Ok(UserPlatform {
                    platform: Self::row_to_platform(row)?,
                    selected: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(platforms)
    }

    fn selected_platform_ids(&self, user_id: i64) -> Result<HashSet<i64>, StoreError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT platform_id FROM user_platforms WHERE user_id = ?1 AND selected = 1",
        )?;
        let ids = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<HashSet<i64>, _>>()?;
        Ok(ids)
    }

    fn replace_selection(&self, user_id: i64, platform_ids: &[i64]) -> Result<usize, StoreError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let exists: Option<i64> = tx
            .query_row("SELECT id FROM users WHERE id = ?1", params![user_id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(format!("User {}", user_id)));
        }

        tx.execute(
            "DELETE FROM user_platforms WHERE user_id = ?1",
            params![user_id],
        )?;

        let mut unique: Vec<i64> = platform_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        {
            let mut insert = tx.prepare_cached(
                "INSERT INTO user_platforms (user_id, platform_id, selected) VALUES (?1, ?2, 1)",
            )?;
            for platform_id in &unique {
                insert
                    .execute(params![user_id, platform_id])
                    .map_err(|e| match e {
                        rusqlite::Error::SqliteFailure(err, _)
                            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
                        {
                            StoreError::NotFound(format!("Platform {}", platform_id))
                        }
                        other => other.into(),
                    })?;
            }
        }

        tx.commit()?;
        Ok(unique.len())
    }
}
