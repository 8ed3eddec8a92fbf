//! Structural validation of create requests.
//!
//! The form never touches the store: it checks the shape of the request,
//! normalizes it into [`ResolutionParams`] and records problems in the shared
//! [`CatalogErrors`] accumulator.

use super::errors::CatalogErrors;
use super::resolution::{
    AlbumParams, ArtistRef, CatalogResolutionService, ReleaseRef, ResolutionParams,
    ResolutionResult,
};
use crate::catalog_store::EntityId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub const AT_LEAST_ONE_RESOURCE: &str = "You must provide at least one resource to create";
pub const ALBUM_NAME_BLANK: &str = "Album name can't be blank";
pub const ALBUM_DURATION_NEGATIVE: &str =
    "Album duration_in_minutes must be greater than or equal to 0";
pub const RELEASE_DATE_INVALID: &str = "Release released_at is not a valid date";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ArtistInput {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReleaseInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub released_at: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AlbumInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_int")]
    pub duration_in_minutes: Option<i64>,
}

/// Body of `POST /api/releases`. Unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogRequest {
    #[serde(default, deserialize_with = "deserialize_optional_int")]
    pub artist_id: Option<EntityId>,
    #[serde(default, deserialize_with = "deserialize_optional_int")]
    pub release_id: Option<EntityId>,
    #[serde(default)]
    pub artist: Option<ArtistInput>,
    #[serde(default)]
    pub release: Option<ReleaseInput>,
    #[serde(default)]
    pub album: Option<AlbumInput>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

/// Accepts integers given either as JSON numbers or as numeric strings.
/// Blank strings and `null` read as absent.
fn deserialize_optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(value)) => Ok(Some(value)),
        Some(IntOrString::Str(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid integer: '{}'", raw)))
        }
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(String::from)
}

/// Parses RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` (read as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_release_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(timestamp.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc())
}

/// Validates a [`CatalogRequest`] and hands it to the resolution service.
pub struct CatalogForm {
    request: CatalogRequest,
}

impl CatalogForm {
    pub fn new(request: CatalogRequest) -> Self {
        CatalogForm { request }
    }

    fn artist_ref(&self) -> Option<ArtistRef> {
        if let Some(id) = self.request.artist_id {
            return Some(ArtistRef::Id(id));
        }
        self.request
            .artist
            .as_ref()
            .and_then(|artist| non_blank(artist.name.as_ref()))
            .map(ArtistRef::Name)
    }

    fn release_ref(&self, errors: &mut CatalogErrors) -> Option<ReleaseRef> {
        if let Some(id) = self.request.release_id {
            return Some(ReleaseRef::Id(id));
        }
        let release = self.request.release.as_ref()?;
        let name = non_blank(release.name.as_ref())?;

        let released_at = match non_blank(release.released_at.as_ref()) {
            None => None,
            Some(raw) => match parse_release_date(&raw) {
                Some(date) => Some(date),
                None => {
                    errors.add(RELEASE_DATE_INVALID);
                    None
                }
            },
        };
        Some(ReleaseRef::Name { name, released_at })
    }

    /// An album object counts as given when it carries any attribute; it
    /// counts as provided only with a non-blank name.
    fn album_params(&self, errors: &mut CatalogErrors) -> Option<AlbumParams> {
        let album = self.request.album.as_ref()?;
        let given = album.name.is_some() || album.duration_in_minutes.is_some();

        let duration_in_minutes = album.duration_in_minutes.unwrap_or(0);
        if duration_in_minutes < 0 {
            errors.add(ALBUM_DURATION_NEGATIVE);
        }

        match non_blank(album.name.as_ref()) {
            Some(name) => Some(AlbumParams {
                name,
                duration_in_minutes,
            }),
            None => {
                if given {
                    errors.add(ALBUM_NAME_BLANK);
                }
                None
            }
        }
    }

    /// Runs every structural check, appending failures to `errors`.
    ///
    /// Returns the normalized parameters when no check failed.
    pub fn validate(&self, errors: &mut CatalogErrors) -> Option<ResolutionParams> {
        let mut shape_errors = CatalogErrors::new();
        let artist = self.artist_ref();
        let release = self.release_ref(&mut shape_errors);
        let album = self.album_params(&mut shape_errors);

        let album_given = album.is_some();
        // A blank album name already explains an otherwise empty request.
        if artist.is_none() && release.is_none() && !album_given && shape_errors.is_empty() {
            errors.add(AT_LEAST_ONE_RESOURCE);
        }

        if album_given {
            let mut missing = vec![];
            if artist.is_none() {
                missing.push("artist");
            }
            if release.is_none() {
                missing.push("release");
            }
            if !missing.is_empty() {
                errors.add(format!(
                    "Album requires {} to be provided",
                    missing.join(" and ")
                ));
            }
        }

        for message in shape_errors.into_messages() {
            errors.add(message);
        }

        if !errors.is_empty() {
            return None;
        }
        Some(ResolutionParams {
            artist,
            release,
            album,
        })
    }

    /// Validates the request and, when it is well formed, resolves it in a
    /// single store transaction. Both stages report into one error list.
    pub fn submit(&self, service: &CatalogResolutionService) -> ResolutionResult {
        let mut errors = CatalogErrors::new();
        match self.validate(&mut errors) {
            Some(params) => service.resolve(&params, errors),
            None => ResolutionResult::failure(errors),
        }
    }
}
