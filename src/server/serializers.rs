//! Response bodies of the release endpoints.
//!
//! The list endpoint answers with a JSON:API document (`data`, `included`,
//! `meta`, `links`); the create endpoint answers with plain entity objects.

use crate::catalog_service::{CatalogErrors, ResolutionResult};
use crate::catalog_store::{format_timestamp, Album, Artist, EntityId, Release, ReleaseListing};
use crate::pagination::{PaginatedCollection, PaginationLinks, PaginationMetadata};
use serde::Serialize;
use std::collections::HashSet;

const RELEASE_TYPE: &str = "release";
const ALBUM_TYPE: &str = "album";
const ARTIST_TYPE: &str = "artist";

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: &'static str,
}

impl ResourceIdentifier {
    fn new(id: EntityId, resource_type: &'static str) -> Self {
        ResourceIdentifier {
            id: id.to_string(),
            resource_type,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct Relationship<T> {
    pub data: T,
}

#[derive(Serialize, Debug)]
pub struct AlbumSummary {
    pub name: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ArtistSummary {
    pub id: EntityId,
    pub name: String,
}

#[derive(Serialize, Debug)]
pub struct ReleaseAttributes {
    pub id: EntityId,
    pub name: String,
    pub album: AlbumSummary,
    pub artists: Vec<ArtistSummary>,
    pub created_at: String,
    pub released_at: String,
    pub duration_in_minutes: i64,
}

#[derive(Serialize, Debug)]
pub struct ReleaseRelationships {
    pub album: Relationship<Option<ResourceIdentifier>>,
    pub artists: Relationship<Vec<ResourceIdentifier>>,
}

#[derive(Serialize, Debug)]
pub struct ReleaseResource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub attributes: ReleaseAttributes,
    pub relationships: ReleaseRelationships,
}

impl From<&ReleaseListing> for ReleaseResource {
    fn from(listing: &ReleaseListing) -> Self {
        let release = &listing.release;
        ReleaseResource {
            id: release.id.to_string(),
            resource_type: RELEASE_TYPE,
            attributes: ReleaseAttributes {
                id: release.id,
                name: release.name.clone(),
                album: AlbumSummary {
                    name: listing.album.as_ref().map(|album| album.name.clone()),
                },
                artists: listing
                    .artists
                    .iter()
                    .map(|artist| ArtistSummary {
                        id: artist.id,
                        name: artist.name.clone(),
                    })
                    .collect(),
                created_at: format_timestamp(&release.created_at),
                released_at: format_timestamp(&release.released_at),
                duration_in_minutes: listing.duration_in_minutes(),
            },
            relationships: ReleaseRelationships {
                album: Relationship {
                    data: listing
                        .album
                        .as_ref()
                        .map(|album| ResourceIdentifier::new(album.id, ALBUM_TYPE)),
                },
                artists: Relationship {
                    data: listing
                        .artists
                        .iter()
                        .map(|artist| ResourceIdentifier::new(artist.id, ARTIST_TYPE))
                        .collect(),
                },
            },
        }
    }
}

#[derive(Serialize, Debug)]
pub struct NameAttributes {
    pub name: String,
}

/// An album or artist in the `included` section.
#[derive(Serialize, Debug)]
pub struct IncludedResource {
    #[serde(flatten)]
    pub identifier: ResourceIdentifier,
    pub attributes: NameAttributes,
}

#[derive(Serialize, Debug)]
pub struct ListMeta {
    pub pagination: PaginationMetadata,
}

#[derive(Serialize, Debug)]
pub struct ReleaseListDocument {
    pub data: Vec<ReleaseResource>,
    pub included: Vec<IncludedResource>,
    pub meta: ListMeta,
    pub links: PaginationLinks,
}

impl ReleaseListDocument {
    pub fn new(collection: PaginatedCollection<ReleaseListing>, links: PaginationLinks) -> Self {
        let (records, pagination) = collection.into_parts();
        let data = records.iter().map(ReleaseResource::from).collect();

        // Each album and artist appears once, in order of first reference.
        let mut seen = HashSet::new();
        let mut included = vec![];
        for listing in &records {
            let album = listing
                .album
                .iter()
                .map(|album| (ResourceIdentifier::new(album.id, ALBUM_TYPE), &album.name));
            let artists = listing
                .artists
                .iter()
                .map(|artist| (ResourceIdentifier::new(artist.id, ARTIST_TYPE), &artist.name));
            for (identifier, name) in album.chain(artists) {
                if seen.insert(identifier.clone()) {
                    included.push(IncludedResource {
                        identifier,
                        attributes: NameAttributes { name: name.clone() },
                    });
                }
            }
        }

        ReleaseListDocument {
            data,
            included,
            meta: ListMeta { pagination },
            links,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Error body of the list endpoint: `{"errors": [{"detail": "..."}]}`.
#[derive(Serialize, Debug)]
pub struct ErrorDetailsDocument {
    pub errors: Vec<ErrorDetail>,
}

impl ErrorDetailsDocument {
    pub fn single(detail: impl Into<String>) -> Self {
        ErrorDetailsDocument {
            errors: vec![ErrorDetail {
                detail: detail.into(),
            }],
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CreatedArtist {
    pub id: EntityId,
    pub name: String,
}

impl From<&Artist> for CreatedArtist {
    fn from(artist: &Artist) -> Self {
        CreatedArtist {
            id: artist.id,
            name: artist.name.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CreatedRelease {
    pub id: EntityId,
    pub name: String,
    pub released_at: String,
}

impl From<&Release> for CreatedRelease {
    fn from(release: &Release) -> Self {
        CreatedRelease {
            id: release.id,
            name: release.name.clone(),
            released_at: format_timestamp(&release.released_at),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CreatedAlbum {
    pub id: EntityId,
    pub name: String,
    pub duration_in_minutes: i64,
}

impl From<&Album> for CreatedAlbum {
    fn from(album: &Album) -> Self {
        CreatedAlbum {
            id: album.id,
            name: album.name.clone(),
            duration_in_minutes: album.duration_in_minutes,
        }
    }
}

/// Success body of the create endpoint. Only resolved entities are present.
#[derive(Serialize, Debug)]
pub struct CreateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<CreatedArtist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<CreatedRelease>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<CreatedAlbum>,
}

impl From<&ResolutionResult> for CreateResponse {
    fn from(result: &ResolutionResult) -> Self {
        CreateResponse {
            artist: result.artist().map(CreatedArtist::from),
            release: result.release().map(CreatedRelease::from),
            album: result.album().map(CreatedAlbum::from),
        }
    }
}

/// Failure body of the create endpoint: `{"errors": ["..."]}`.
#[derive(Serialize, Debug)]
pub struct CreateErrorsDocument<'a> {
    pub errors: &'a CatalogErrors,
}
