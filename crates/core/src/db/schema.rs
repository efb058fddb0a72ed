use rusqlite::{params, Connection};

use super::StoreError;
use crate::catalog::SEED_GENRES;
use crate::platforms::SEED_PLATFORMS;

/// Create every table used by the stores and insert the static reference
/// rows (platforms and genres). Safe to run on an existing database.
pub fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS platforms (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            color TEXT NOT NULL,
            provider_id INTEGER NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS user_platforms (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            platform_id INTEGER NOT NULL REFERENCES platforms(id),
            selected INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (user_id, platform_id)
        );

        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            tv_id INTEGER
        );

        -- One row per (kind, external_id); refreshed on every provider fetch
        CREATE TABLE IF NOT EXISTS catalog_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            external_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            poster_url TEXT,
            backdrop_url TEXT,
            release_date TEXT,
            rating REAL NOT NULL DEFAULT 0,
            popularity REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL,
            UNIQUE(kind, external_id)
        );

        CREATE INDEX IF NOT EXISTS idx_catalog_items_popularity
            ON catalog_items(kind, popularity DESC);

        -- Provider genre ids; series use TV ids that have no genres row
        CREATE TABLE IF NOT EXISTS item_genres (
            item_id INTEGER NOT NULL REFERENCES catalog_items(id) ON DELETE CASCADE,
            genre_id INTEGER NOT NULL,
            PRIMARY KEY (item_id, genre_id)
        );

        CREATE TABLE IF NOT EXISTS item_platforms (
            item_id INTEGER NOT NULL REFERENCES catalog_items(id) ON DELETE CASCADE,
            platform_id INTEGER NOT NULL REFERENCES platforms(id),
            PRIMARY KEY (item_id, platform_id)
        );

        CREATE INDEX IF NOT EXISTS idx_item_platforms_platform
            ON item_platforms(platform_id);

        -- Marks items whose availability was fetched, even when it was empty
        CREATE TABLE IF NOT EXISTS availability_checks (
            item_id INTEGER PRIMARY KEY REFERENCES catalog_items(id) ON DELETE CASCADE,
            checked_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS favorites (
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            item_id INTEGER NOT NULL REFERENCES catalog_items(id) ON DELETE CASCADE,
            added_at TEXT NOT NULL,
            PRIMARY KEY (user_id, item_id)
        );

        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            item_id INTEGER NOT NULL REFERENCES catalog_items(id) ON DELETE CASCADE,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(user_id, item_id)
        );

        CREATE INDEX IF NOT EXISTS idx_reviews_item ON reviews(item_id, created_at DESC);
        "#,
    )?;

    seed_reference_data(conn)
}

fn seed_reference_data(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO platforms (id, name, icon, color, provider_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for p in SEED_PLATFORMS {
        stmt.execute(params![p.id, p.name, p.icon, p.color, p.provider_id])?;
    }

    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO genres (id, name, slug, tv_id) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for g in SEED_GENRES {
        stmt.execute(params![g.id, g.name, g.slug, g.tv_id])?;
    }

    Ok(())
}
