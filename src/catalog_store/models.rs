//! Catalog entity models.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Serialize, Serializer};

pub type EntityId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: EntityId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Release {
    pub id: EntityId,
    pub name: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub released_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Album {
    pub id: EntityId,
    pub name: String,
    pub duration_in_minutes: i64,
    pub artist_id: EntityId,
    pub release_id: EntityId,
}

/// Link between an artist and a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistRelease {
    pub artist_id: EntityId,
    pub release_id: EntityId,
}

/// Attributes of an album about to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAlbum {
    pub name: String,
    pub duration_in_minutes: i64,
    pub artist_id: EntityId,
    pub release_id: EntityId,
}

/// A release together with the entities the list endpoint renders with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseListing {
    pub release: Release,
    pub album: Option<Album>,
    pub artists: Vec<Artist>,
}

impl ReleaseListing {
    pub fn duration_in_minutes(&self) -> i64 {
        self.album
            .as_ref()
            .map(|album| album.duration_in_minutes)
            .unwrap_or(0)
    }
}

/// Time based filter applied when listing releases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseFilter {
    All,
    /// Released at or before the reference instant.
    Past { as_of: DateTime<Utc> },
    /// Released strictly after the reference instant.
    Upcoming { as_of: DateTime<Utc> },
}

/// Formats a timestamp the way the API exposes it: `2024-09-26T12:00:00Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn timestamp_from_unix(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(timestamp))
}
