//! SQLite-backed catalog store implementation.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::{CatalogStore, CatalogWriter, TransactionWork};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// SQLite-backed catalog store.
///
/// Writes are serialized through a single connection; reads are spread over a
/// small pool of read-only connections (the database runs in WAL mode).
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn create_or_validate_schema(conn: &Connection) -> Result<()> {
    let latest_schema = CATALOG_VERSIONED_SCHEMAS
        .last()
        .ok_or_else(|| anyhow!("No catalog schema defined"))?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!(
            "Creating catalog db schema at version {}",
            latest_schema.version
        );
        return latest_schema.create(conn);
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    let expected_version = (BASE_DB_VERSION + latest_schema.version) as i64;
    if db_version != expected_version {
        bail!(
            "Unsupported catalog db version {} (expected {})",
            db_version,
            expected_version
        );
    }
    latest_schema
        .validate(conn)
        .context("Catalog db schema validation failed")
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("Catalog db connection lock poisoned"))
}

fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Parse a Release from a row (id, name, released_at, created_at).
fn parse_release_row(row: &rusqlite::Row) -> rusqlite::Result<Release> {
    Ok(Release {
        id: row.get(0)?,
        name: row.get(1)?,
        released_at: timestamp_from_unix(row.get(2)?),
        created_at: timestamp_from_unix(row.get(3)?),
    })
}

/// Parse an Album from a row (id, name, duration_in_minutes, artist_id, release_id).
fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        name: row.get(1)?,
        duration_in_minutes: row.get(2)?,
        artist_id: row.get(3)?,
        release_id: row.get(4)?,
    })
}

const RELEASE_COLUMNS: &str = "id, name, released_at, created_at";
const ALBUM_COLUMNS: &str = "id, name, duration_in_minutes, artist_id, release_id";

/// SQL `WHERE` clause and its parameters for a release filter.
fn release_filter_clause(filter: ReleaseFilter) -> (&'static str, Vec<i64>) {
    match filter {
        ReleaseFilter::All => ("", vec![]),
        ReleaseFilter::Past { as_of } => (" WHERE released_at <= ?", vec![as_of.timestamp()]),
        ReleaseFilter::Upcoming { as_of } => (" WHERE released_at > ?", vec![as_of.timestamp()]),
    }
}

fn query_artist(conn: &Connection, id: EntityId) -> Result<Option<Artist>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM artists WHERE id = ?1")?;
    Ok(stmt.query_row(params![id], parse_artist_row).optional()?)
}

fn query_release(conn: &Connection, id: EntityId) -> Result<Option<Release>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM releases WHERE id = ?1",
        RELEASE_COLUMNS
    ))?;
    Ok(stmt.query_row(params![id], parse_release_row).optional()?)
}

fn query_album_for_release(conn: &Connection, release_id: EntityId) -> Result<Option<Album>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM albums WHERE release_id = ?1",
        ALBUM_COLUMNS
    ))?;
    Ok(stmt.query_row(params![release_id], parse_album_row).optional()?)
}

fn query_release_artists(conn: &Connection, release_id: EntityId) -> Result<Vec<Artist>> {
    let mut stmt = conn.prepare_cached(
        "SELECT a.id, a.name FROM artists a
         JOIN artist_releases ar ON ar.artist_id = a.id
         WHERE ar.release_id = ?1
         ORDER BY a.id",
    )?;
    let artists = stmt
        .query_map(params![release_id], parse_artist_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(artists)
}

fn count_table(conn: &Connection, table: &str) -> usize {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get::<_, i64>(0)
    })
    .unwrap_or(0) as usize
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database at `db_path`.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of read-only connections (at least 1)
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path))?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        create_or_validate_schema(&write_conn)?;

        let read_pool_size = read_pool_size.max(1);
        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .context("Failed to open catalog read connection")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn get_artist(&self, id: EntityId) -> Result<Option<Artist>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        query_artist(&conn, id)
    }

    fn get_release(&self, id: EntityId) -> Result<Option<Release>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        query_release(&conn, id)
    }

    fn count_releases(&self, filter: ReleaseFilter) -> Result<usize> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;

        let (clause, values) = release_filter_clause(filter);
        let count: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM releases{}", clause),
                params_from_iter(values.iter()),
                |r| r.get(0),
            )
            .context("Failed to count releases")?;
        Ok(count as usize)
    }

    fn list_releases(
        &self,
        filter: ReleaseFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ReleaseListing>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;

        let (clause, mut values) = release_filter_clause(filter);
        values.push(limit as i64);
        values.push(offset as i64);

        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM releases{} ORDER BY released_at DESC, id DESC LIMIT ? OFFSET ?",
            RELEASE_COLUMNS, clause
        ))?;
        let releases = stmt
            .query_map(params_from_iter(values.iter()), parse_release_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list releases")?;

        releases
            .into_iter()
            .map(|release| -> Result<ReleaseListing> {
                let album = query_album_for_release(&conn, release.id)?;
                let artists = query_release_artists(&conn, release.id)?;
                Ok(ReleaseListing {
                    release,
                    album,
                    artists,
                })
            })
            .collect()
    }

    fn get_artists_count(&self) -> usize {
        match lock(&self.get_read_conn()) {
            Ok(conn) => count_table(&conn, "artists"),
            Err(_) => 0,
        }
    }

    fn get_releases_count(&self) -> usize {
        match lock(&self.get_read_conn()) {
            Ok(conn) => count_table(&conn, "releases"),
            Err(_) => 0,
        }
    }

    fn get_albums_count(&self) -> usize {
        match lock(&self.get_read_conn()) {
            Ok(conn) => count_table(&conn, "albums"),
            Err(_) => 0,
        }
    }

    fn with_write_transaction(&self, work: TransactionWork<'_>) -> Result<()> {
        let conn = lock(&self.write_conn)?;
        conn.execute("BEGIN IMMEDIATE", [])?;

        let result = work(&SqliteCatalogWriter { conn: &conn });
        finish_transaction(&conn, result)
    }
}

/// Commits on success. Any failure, a failed `COMMIT` included, leaves the
/// connection rolled back and out of the transaction.
fn finish_transaction(conn: &Connection, result: Result<()>) -> Result<()> {
    let result = result.and_then(|()| {
        conn.execute("COMMIT", [])
            .context("Failed to commit catalog transaction")?;
        Ok(())
    });
    if result.is_err() && !conn.is_autocommit() {
        let _ = conn.execute("ROLLBACK", []);
    }
    result
}

/// `CatalogWriter` bound to the write connection of an open transaction.
struct SqliteCatalogWriter<'a> {
    conn: &'a Connection,
}

impl CatalogWriter for SqliteCatalogWriter<'_> {
    fn get_artist(&self, id: EntityId) -> Result<Option<Artist>> {
        query_artist(self.conn, id)
    }

    fn get_release(&self, id: EntityId) -> Result<Option<Release>> {
        query_release(self.conn, id)
    }

    fn find_or_create_artist(&self, name: &str) -> Result<Artist> {
        // A concurrent insert of the same name lands on the conflict branch.
        let inserted = self.conn.execute(
            "INSERT INTO artists (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        if inserted > 0 {
            debug!("Created artist '{}'", name);
        }

        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM artists WHERE name = ?1")?;
        stmt.query_row(params![name], parse_artist_row)
            .with_context(|| format!("Artist '{}' missing after insert", name))
    }

    fn find_or_create_release(&self, name: &str, released_at: DateTime<Utc>) -> Result<Release> {
        let existing = {
            let mut stmt = self.conn.prepare_cached(&format!(
                "SELECT {} FROM releases WHERE name = ?1 ORDER BY id LIMIT 1",
                RELEASE_COLUMNS
            ))?;
            stmt.query_row(params![name], parse_release_row).optional()?
        };
        if let Some(release) = existing {
            return Ok(release);
        }

        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO releases (name, released_at) VALUES (?1, ?2) RETURNING {}",
            RELEASE_COLUMNS
        ))?;
        let release = stmt.query_row(params![name, released_at.timestamp()], parse_release_row)?;
        debug!("Created release '{}' ({})", release.name, release.id);
        Ok(release)
    }

    fn get_album_for_release(&self, release_id: EntityId) -> Result<Option<Album>> {
        query_album_for_release(self.conn, release_id)
    }

    fn insert_album(&self, album: &NewAlbum) -> Result<Album> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO albums (name, duration_in_minutes, artist_id, release_id)
             VALUES (?1, ?2, ?3, ?4) RETURNING {}",
            ALBUM_COLUMNS
        ))?;
        let created = stmt
            .query_row(
                params![
                    &album.name,
                    album.duration_in_minutes,
                    album.artist_id,
                    album.release_id
                ],
                parse_album_row,
            )
            .with_context(|| format!("Failed to insert album '{}'", album.name))?;
        debug!("Created album '{}' ({})", created.name, created.id);
        Ok(created)
    }

    fn ensure_artist_release(
        &self,
        artist_id: EntityId,
        release_id: EntityId,
    ) -> Result<ArtistRelease> {
        self.conn.execute(
            "INSERT OR IGNORE INTO artist_releases (artist_id, release_id) VALUES (?1, ?2)",
            params![artist_id, release_id],
        )?;
        Ok(ArtistRelease {
            artist_id,
            release_id,
        })
    }
}
