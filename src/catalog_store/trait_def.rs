//! Catalog store trait definitions.
//!
//! `CatalogStore` is what the server holds on to; `CatalogWriter` is the view
//! handed to code running inside a write transaction.

use super::models::*;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Operations available inside a write transaction.
///
/// Every read goes through the transaction's connection, so rows written
/// earlier in the same transaction are visible.
pub trait CatalogWriter {
    /// Get an artist by ID.
    fn get_artist(&self, id: EntityId) -> Result<Option<Artist>>;

    /// Get a release by ID.
    fn get_release(&self, id: EntityId) -> Result<Option<Release>>;

    /// Return the artist with the given name, creating it if missing.
    fn find_or_create_artist(&self, name: &str) -> Result<Artist>;

    /// Return the release with the given name, creating it with
    /// `released_at` if missing. An existing release keeps its date.
    fn find_or_create_release(&self, name: &str, released_at: DateTime<Utc>) -> Result<Release>;

    /// Get the album owned by a release, if any.
    fn get_album_for_release(&self, release_id: EntityId) -> Result<Option<Album>>;

    fn insert_album(&self, album: &NewAlbum) -> Result<Album>;

    /// Link an artist to a release. Linking an already linked pair is a no-op.
    fn ensure_artist_release(
        &self,
        artist_id: EntityId,
        release_id: EntityId,
    ) -> Result<ArtistRelease>;
}

/// Unit of work executed inside a write transaction.
///
/// Returning an error rolls back everything written through the writer.
pub type TransactionWork<'a> = &'a mut dyn FnMut(&dyn CatalogWriter) -> Result<()>;

/// Trait for catalog storage backends.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Entity Retrieval
    // =========================================================================

    fn get_artist(&self, id: EntityId) -> Result<Option<Artist>>;

    fn get_release(&self, id: EntityId) -> Result<Option<Release>>;

    // =========================================================================
    // Release Listing
    // =========================================================================

    /// Count the releases matching `filter`.
    fn count_releases(&self, filter: ReleaseFilter) -> Result<usize>;

    /// List releases matching `filter`, newest first, with their album and
    /// artists attached.
    fn list_releases(
        &self,
        filter: ReleaseFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ReleaseListing>>;

    // =========================================================================
    // Counts (for startup logging)
    // =========================================================================

    fn get_artists_count(&self) -> usize;

    fn get_releases_count(&self) -> usize;

    fn get_albums_count(&self) -> usize;

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Run `work` inside a single write transaction. The transaction commits
    /// when `work` returns `Ok` and rolls back otherwise; the error returned by
    /// `work` is passed through unchanged.
    fn with_write_transaction(&self, work: TransactionWork<'_>) -> Result<()>;
}
