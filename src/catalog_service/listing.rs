//! Release listing with the `past` filter and pagination.

use crate::catalog_store::{CatalogStore, ReleaseFilter, ReleaseListing};
use crate::pagination::{PageSource, PaginatedCollection, Paginator};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

pub const FETCH_FAILED: &str = "An error occurred while fetching releases";

/// Query parameters accepted by the release list. Anything else is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReleaseListParams {
    pub past: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("Invalid 'past' parameter. Must be 0 or 1.")]
    InvalidPast,

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ListError {
    /// Message shown to API clients.
    pub fn detail(&self) -> String {
        match self {
            ListError::InvalidPast => self.to_string(),
            ListError::Store(_) => FETCH_FAILED.to_string(),
        }
    }
}

/// Maps the raw `past` value to a filter evaluated at `now`.
///
/// A missing or blank value lists everything; `"1"` lists releases out at
/// `now`, `"0"` lists upcoming ones. Any other value, padded ones included,
/// is rejected.
pub fn parse_past_filter(past: Option<&str>, now: DateTime<Utc>) -> Result<ReleaseFilter, ListError> {
    match past {
        None => Ok(ReleaseFilter::All),
        Some(raw) if raw.trim().is_empty() => Ok(ReleaseFilter::All),
        Some("1") => Ok(ReleaseFilter::Past { as_of: now }),
        Some("0") => Ok(ReleaseFilter::Upcoming { as_of: now }),
        Some(_) => Err(ListError::InvalidPast),
    }
}

struct ReleaseSource<'a> {
    store: &'a dyn CatalogStore,
    filter: ReleaseFilter,
}

impl PageSource<ReleaseListing> for ReleaseSource<'_> {
    fn total_count(&self) -> Result<usize> {
        self.store.count_releases(self.filter)
    }

    fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<ReleaseListing>> {
        self.store.list_releases(self.filter, offset, limit)
    }
}

#[derive(Clone)]
pub struct ReleaseListService {
    store: Arc<dyn CatalogStore>,
    paginator: Paginator<ReleaseListing>,
}

impl ReleaseListService {
    pub fn new(store: Arc<dyn CatalogStore>, paginator: Paginator<ReleaseListing>) -> Self {
        ReleaseListService { store, paginator }
    }

    pub fn list(
        &self,
        params: &ReleaseListParams,
    ) -> Result<PaginatedCollection<ReleaseListing>, ListError> {
        let filter = parse_past_filter(params.past.as_deref(), Utc::now())?;
        let source = ReleaseSource {
            store: self.store.as_ref(),
            filter,
        };

        self.paginator
            .paginate(&source, params.page.as_deref(), params.limit.as_deref())
            .map_err(|err| {
                error!("Failed to list releases: {:#}", err);
                ListError::Store(err)
            })
    }
}
