use anyhow::{Context, Result};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::State, middleware, response::IntoResponse, routing::get, Json, Router,
};
use serde::Serialize;
use tracing::info;

use super::release_routes::make_release_routes;
use super::{log_requests, state::*, ServerConfig};
use crate::catalog_service::{CatalogResolutionService, ReleaseListService};
use crate::catalog_store::ReleaseListing;
use crate::pagination::Paginator;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

impl ServerState {
    fn new(
        config: ServerConfig,
        catalog_store: GuardedCatalogStore,
        paginator: Paginator<ReleaseListing>,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            release_list_service: Arc::new(ReleaseListService::new(
                catalog_store.clone(),
                paginator,
            )),
            resolution_service: Arc::new(CatalogResolutionService::new(catalog_store)),
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    paginator: Paginator<ReleaseListing>,
) -> Result<Router> {
    let state = ServerState::new(config, catalog_store, paginator);

    let home_router: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone());

    let app: Router = home_router
        .nest("/api", make_release_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(
    catalog_store: GuardedCatalogStore,
    paginator: Paginator<ReleaseListing>,
    config: ServerConfig,
) -> Result<()> {
    let address = format!("{}:{}", config.bind_address, config.port);
    let app = make_app(config, catalog_store, paginator)?;

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    Ok(axum::serve(listener, app).await?)
}
