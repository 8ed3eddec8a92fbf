use axum::extract::FromRef;

use crate::catalog_service::{CatalogResolutionService, ReleaseListService};
use crate::catalog_store::CatalogStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedReleaseListService = Arc<ReleaseListService>;
pub type GuardedResolutionService = Arc<CatalogResolutionService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub release_list_service: GuardedReleaseListService,
    pub resolution_service: GuardedResolutionService,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedReleaseListService {
    fn from_ref(input: &ServerState) -> Self {
        input.release_list_service.clone()
    }
}

impl FromRef<ServerState> for GuardedResolutionService {
    fn from_ref(input: &ServerState) -> Self {
        input.resolution_service.clone()
    }
}
