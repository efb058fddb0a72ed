use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use super::{AccountStore, Registration, User};
use crate::db::{format_timestamp, parse_timestamp, SqlitePool, StoreError};

/// SQLite-backed account store.
pub struct SqliteAccountStore {
    pool: Arc<SqlitePool>,
}

impl SqliteAccountStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let created_at: String = row.get(6)?;
        Ok(User {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
            password_hash: row.get(5)?,
            created_at: parse_timestamp(&created_at),
        })
    }
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, password_hash, created_at";

impl AccountStore for SqliteAccountStore {
    fn create(
        &self,
        registration: &Registration,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let conn = self.pool.get()?;
        let result = conn.query_row(
            &format!(
                "INSERT INTO users (first_name, last_name, email, phone, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {}",
                USER_COLUMNS
            ),
            params![
                registration.first_name,
                registration.last_name,
                registration.email,
                registration.phone,
                password_hash,
                format_timestamp(created_at),
            ],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(user),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Conflict(format!(
                    "Email {} is already registered",
                    registration.email
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let conn = self.pool.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                params![email],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn get(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.pool.get()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }
}
