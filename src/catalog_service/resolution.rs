//! Composite creation of artists, releases and albums.
//!
//! Everything a request asks for is resolved inside one write transaction:
//! either every entity is found or created, or nothing is written.

use super::errors::CatalogErrors;
use crate::catalog_store::{
    Album, Artist, CatalogStore, CatalogWriter, EntityId, NewAlbum, Release,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

pub const CREATION_FAILED: &str = "An error occurred while creating catalog entries";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtistRef {
    Id(EntityId),
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseRef {
    Id(EntityId),
    /// Found by name, or created with `released_at` (now when absent).
    Name {
        name: String,
        released_at: Option<DateTime<Utc>>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlbumParams {
    pub name: String,
    pub duration_in_minutes: i64,
}

/// Normalized input of a create request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionParams {
    pub artist: Option<ArtistRef>,
    pub release: Option<ReleaseRef>,
    pub album: Option<AlbumParams>,
}

/// Failures that abort the creation transaction with a user facing message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Couldn't find {entity} with 'id'={id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("To create an album you must provide: {}", .0.join(" and "))]
    MissingAlbumDependencies(Vec<&'static str>),

    #[error("The release '{release}' already has an associated album: '{album}'")]
    ReleaseAlreadyHasAlbum { release: String, album: String },
}

/// Outcome of a create request.
#[derive(Clone, Debug, Default)]
pub struct ResolutionResult {
    artist: Option<Artist>,
    release: Option<Release>,
    album: Option<Album>,
    errors: CatalogErrors,
}

impl ResolutionResult {
    pub fn failure(errors: CatalogErrors) -> Self {
        ResolutionResult {
            errors,
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn artist(&self) -> Option<&Artist> {
        self.artist.as_ref()
    }

    pub fn release(&self) -> Option<&Release> {
        self.release.as_ref()
    }

    pub fn album(&self) -> Option<&Album> {
        self.album.as_ref()
    }

    pub fn errors(&self) -> &CatalogErrors {
        &self.errors
    }
}

#[derive(Default)]
struct Resolved {
    artist: Option<Artist>,
    release: Option<Release>,
    album: Option<Album>,
}

fn resolve_artist(writer: &dyn CatalogWriter, artist: &ArtistRef) -> Result<Artist> {
    match artist {
        ArtistRef::Id(id) => writer.get_artist(*id)?.ok_or_else(|| {
            ResolutionError::NotFound {
                entity: "Artist",
                id: *id,
            }
            .into()
        }),
        ArtistRef::Name(name) => writer.find_or_create_artist(name),
    }
}

fn resolve_release(writer: &dyn CatalogWriter, release: &ReleaseRef) -> Result<Release> {
    match release {
        ReleaseRef::Id(id) => writer.get_release(*id)?.ok_or_else(|| {
            ResolutionError::NotFound {
                entity: "Release",
                id: *id,
            }
            .into()
        }),
        ReleaseRef::Name { name, released_at } => {
            writer.find_or_create_release(name, released_at.unwrap_or_else(Utc::now))
        }
    }
}

fn create_album(
    writer: &dyn CatalogWriter,
    params: &AlbumParams,
    artist: Option<&Artist>,
    release: Option<&Release>,
) -> Result<Album> {
    let (artist, release) = match (artist, release) {
        (Some(artist), Some(release)) => (artist, release),
        _ => {
            let mut missing = vec![];
            if artist.is_none() {
                missing.push("artist");
            }
            if release.is_none() {
                missing.push("release");
            }
            return Err(ResolutionError::MissingAlbumDependencies(missing).into());
        }
    };

    if let Some(existing) = writer.get_album_for_release(release.id)? {
        return Err(ResolutionError::ReleaseAlreadyHasAlbum {
            release: release.name.clone(),
            album: existing.name,
        }
        .into());
    }

    writer.insert_album(&NewAlbum {
        name: params.name.clone(),
        duration_in_minutes: params.duration_in_minutes,
        artist_id: artist.id,
        release_id: release.id,
    })
}

fn resolve_all(writer: &dyn CatalogWriter, params: &ResolutionParams) -> Result<Resolved> {
    let artist = params
        .artist
        .as_ref()
        .map(|artist| resolve_artist(writer, artist))
        .transpose()?;
    let release = params
        .release
        .as_ref()
        .map(|release| resolve_release(writer, release))
        .transpose()?;

    let album = params
        .album
        .as_ref()
        .map(|album| create_album(writer, album, artist.as_ref(), release.as_ref()))
        .transpose()?;

    if let (Some(artist), Some(release)) = (&artist, &release) {
        writer.ensure_artist_release(artist.id, release.id)?;
    }

    Ok(Resolved {
        artist,
        release,
        album,
    })
}

/// Resolves or creates the entities of a create request.
#[derive(Clone)]
pub struct CatalogResolutionService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogResolutionService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        CatalogResolutionService { store }
    }

    /// Runs the whole request in one write transaction.
    ///
    /// Failures are appended to `errors` and returned inside the result; this
    /// never returns an error itself. When `errors` already holds messages the
    /// store is not touched.
    pub fn resolve(&self, params: &ResolutionParams, mut errors: CatalogErrors) -> ResolutionResult {
        if !errors.is_empty() {
            return ResolutionResult::failure(errors);
        }

        let mut resolved = Resolved::default();
        let outcome = self.store.with_write_transaction(&mut |writer| {
            resolved = resolve_all(writer, params)?;
            Ok(())
        });

        match outcome {
            Ok(()) => {
                debug!(
                    "Resolved catalog entries: artist={:?} release={:?} album={:?}",
                    resolved.artist.as_ref().map(|a| a.id),
                    resolved.release.as_ref().map(|r| r.id),
                    resolved.album.as_ref().map(|a| a.id),
                );
                ResolutionResult {
                    artist: resolved.artist,
                    release: resolved.release,
                    album: resolved.album,
                    errors,
                }
            }
            Err(err) => {
                match err.downcast_ref::<ResolutionError>() {
                    Some(resolution_error) => errors.add(resolution_error.to_string()),
                    None => {
                        error!("Catalog creation failed: {:#}", err);
                        errors.add(CREATION_FAILED);
                    }
                }
                ResolutionResult::failure(errors)
            }
        }
    }
}
