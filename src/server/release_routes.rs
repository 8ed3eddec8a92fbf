//! `/api/releases` handlers.

use super::serializers::{
    CreateErrorsDocument, CreateResponse, ErrorDetailsDocument, ReleaseListDocument,
};
use super::state::{GuardedReleaseListService, GuardedResolutionService, ServerState};
use crate::catalog_service::{
    CatalogErrors, CatalogForm, CatalogRequest, ReleaseListParams, CREATION_FAILED, FETCH_FAILED,
};
use crate::pagination::LinksBuilder;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use tracing::{debug, error, warn};

pub const RELEASES_PATH: &str = "/api/releases";

async fn list_releases(
    State(service): State<GuardedReleaseListService>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let params = ReleaseListParams {
        past: query.get("past").cloned(),
        page: query.get("page").cloned(),
        limit: query.get("limit").cloned(),
    };

    let result = tokio::task::spawn_blocking(move || service.list(&params)).await;
    match result {
        Ok(Ok(collection)) => {
            let links = LinksBuilder::new(RELEASES_PATH, collection.metadata(), &query).build();
            Json(ReleaseListDocument::new(collection, links)).into_response()
        }
        Ok(Err(err)) => {
            warn!("Release listing failed: {}", err);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorDetailsDocument::single(err.detail())),
            )
                .into_response()
        }
        Err(err) => {
            error!("Release listing task failed: {}", err);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorDetailsDocument::single(FETCH_FAILED)),
            )
                .into_response()
        }
    }
}

async fn create_release(
    State(service): State<GuardedResolutionService>,
    Json(request): Json<CatalogRequest>,
) -> Response {
    let result =
        tokio::task::spawn_blocking(move || CatalogForm::new(request).submit(&service)).await;

    let result = match result {
        Ok(result) => result,
        Err(err) => {
            error!("Catalog creation task failed: {}", err);
            let mut errors = CatalogErrors::new();
            errors.add(CREATION_FAILED);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(CreateErrorsDocument { errors: &errors }),
            )
                .into_response();
        }
    };

    if result.is_success() {
        debug!("Catalog entries created");
        (StatusCode::CREATED, Json(CreateResponse::from(&result))).into_response()
    } else {
        warn!(
            "Catalog creation rejected: {}",
            result.errors().messages().join("; ")
        );
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(CreateErrorsDocument {
                errors: result.errors(),
            }),
        )
            .into_response()
    }
}

pub fn make_release_routes(state: ServerState) -> Router {
    Router::new()
        .route("/releases", get(list_releases).post(create_release))
        .with_state(state)
}
