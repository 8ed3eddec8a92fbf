//! Test fixture creation for the catalog database
//!
//! Seed data goes in with direct SQL so fixtures do not depend on the
//! creation endpoint under test.

use super::constants::*;
use anyhow::Result;
use chrono::{Duration, Utc};
use release_catalog_server::catalog_store::SqliteCatalogStore;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary catalog with 15 past and 2 upcoming releases, one
/// artist and one album.
/// Returns (temp_dir, catalog_db_path)
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");

    // Initialize the store (creates schema)
    drop(SqliteCatalogStore::new(&catalog_db_path, 1)?);

    let conn = Connection::open(&catalog_db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    let now = Utc::now();
    for i in 1..=PAST_RELEASES_COUNT {
        let released_at = now - Duration::days(i as i64);
        conn.execute(
            "INSERT INTO releases (id, name, released_at) VALUES (?1, ?2, ?3)",
            params![
                i as i64,
                format!("Past Release {:02}", i),
                released_at.timestamp()
            ],
        )?;
    }
    for i in 1..=UPCOMING_RELEASES_COUNT {
        let released_at = now + Duration::days(10 * i as i64);
        conn.execute(
            "INSERT INTO releases (id, name, released_at) VALUES (?1, ?2, ?3)",
            params![
                (PAST_RELEASES_COUNT + i) as i64,
                format!("Upcoming Release {:02}", i),
                released_at.timestamp()
            ],
        )?;
    }

    conn.execute(
        "INSERT INTO artists (id, name) VALUES (?1, ?2)",
        params![SEEDED_ARTIST_ID, SEEDED_ARTIST_NAME],
    )?;
    conn.execute(
        "INSERT INTO albums (name, duration_in_minutes, artist_id, release_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            SEEDED_ALBUM_NAME,
            SEEDED_ALBUM_DURATION,
            SEEDED_ARTIST_ID,
            SEEDED_RELEASE_ID
        ],
    )?;
    conn.execute(
        "INSERT INTO artist_releases (artist_id, release_id) VALUES (?1, ?2)",
        params![SEEDED_ARTIST_ID, SEEDED_RELEASE_ID],
    )?;

    Ok((dir, catalog_db_path))
}
