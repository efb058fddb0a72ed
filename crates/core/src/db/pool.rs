//! Bounded pool of SQLite connections on top of `r2d2`.
//!
//! Connections are checked out as [`PooledConnection`] guards which hand the
//! connection back on drop, so a failing request can never leak one.

use std::path::Path;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{debug, warn};

use super::{schema::initialize_schema, StoreError};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A connection checked out of a [`SqlitePool`].
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Bounded pool of SQLite connections shared by all stores.
pub struct SqlitePool {
    inner: r2d2::Pool<SqliteConnectionManager>,
}

impl SqlitePool {
    /// Open a pool of `size` connections to the database at `path`, creating
    /// the schema (and seed rows) if needed.
    pub fn open(path: &Path, size: usize, acquire_timeout: Duration) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| configure(conn, true));
        let inner = r2d2::Pool::builder()
            .max_size(size.max(1) as u32)
            .connection_timeout(acquire_timeout)
            .build(manager)?;

        let pool = Self { inner };
        initialize_schema(&*pool.get()?)?;

        debug!(path = %path.display(), size = pool.size(), "Opened SQLite pool");
        Ok(pool)
    }

    /// Single-connection in-memory pool (useful for testing).
    ///
    /// Each in-memory connection is its own database, so the pool holds
    /// exactly one and never recycles it.
    pub fn in_memory() -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| configure(conn, false));
        let inner = r2d2::Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        let pool = Self { inner };
        initialize_schema(&*pool.get()?)?;
        Ok(pool)
    }

    /// Check out a connection, waiting up to the acquire timeout.
    pub fn get(&self) -> Result<PooledConnection, StoreError> {
        self.inner.get().map_err(|e| {
            warn!(
                size = self.size(),
                error = %e,
                "Failed to check out a database connection"
            );
            StoreError::from(e)
        })
    }

    /// Total number of connections the pool may hold.
    pub fn size(&self) -> usize {
        self.inner.max_size() as usize
    }

    /// Number of connections currently checked in.
    pub fn idle_count(&self) -> usize {
        self.inner.state().idle_connections as usize
    }
}

fn configure(conn: &mut Connection, wal: bool) -> Result<(), rusqlite::Error> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if wal {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "Configured SQLite connection");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_pool_has_schema() {
        let pool = SqlitePool::in_memory().unwrap();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM platforms", [], |row| row.get(0))
            .unwrap();
        assert!(count > 0);
    }

    #[test]
    fn test_in_memory_pool_keeps_data_between_checkouts() {
        let pool = SqlitePool::in_memory().unwrap();
        pool.get()
            .unwrap()
            .execute(
                "INSERT INTO users (first_name, last_name, email, phone, password_hash, created_at)
                 VALUES ('Ana', 'Ruiz', 'ana@example.com', '600000000', 'x', '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        let count: i64 = pool
            .get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_guard_returns_connection_on_drop() {
        let pool = SqlitePool::in_memory().unwrap();
        assert_eq!(pool.idle_count(), 1);
        {
            let _conn = pool.get().unwrap();
            assert_eq!(pool.idle_count(), 0);
        }
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_guard_returns_connection_after_failed_query() {
        let pool = SqlitePool::in_memory().unwrap();
        let result: Result<i64, StoreError> = (|| {
            let conn = pool.get()?;
            let n = conn.query_row("SELECT COUNT(*) FROM no_such_table", [], |row| row.get(0))?;
            Ok(n)
        })();

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_exhausted_pool_times_out() {
        let dir = TempDir::new().unwrap();
        let pool =
            SqlitePool::open(&dir.path().join("t.db"), 1, Duration::from_millis(100)).unwrap();

        let _held = pool.get().unwrap();
        let result = pool.get();
        assert!(matches!(result, Err(StoreError::Pool(_))));
    }

    #[test]
    fn test_waiter_gets_released_connection() {
        let dir = TempDir::new().unwrap();
        let pool = Arc::new(
            SqlitePool::open(&dir.path().join("t.db"), 1, Duration::from_secs(5)).unwrap(),
        );

        let held = pool.get().unwrap();
        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || pool.get().map(|_| ()).is_ok())
        };
        thread::sleep(Duration::from_millis(50));
        drop(held);

        assert!(waiter.join().unwrap());
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_file_pool_shares_data_between_connections() {
        let dir = TempDir::new().unwrap();
        let pool = SqlitePool::open(&dir.path().join("t.db"), 2, Duration::from_secs(1)).unwrap();
        assert_eq!(pool.size(), 2);

        let a = pool.get().unwrap();
        let b = pool.get().unwrap();
        a.execute(
            "INSERT INTO users (first_name, last_name, email, phone, password_hash, created_at)
             VALUES ('Ana', 'Ruiz', 'ana@example.com', '600000000', 'x', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        let count: i64 = b
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
