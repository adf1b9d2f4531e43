use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use once_cell::sync::Lazy;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::ServiceKind;
use service::product::{
    CreateProductService, DeleteProductService, ProductRepository, ReadProductService, UpdateProductService,
};

use crate::{errors::JsonApiError, observability};

pub mod create;
pub mod delete;
pub mod read;
pub mod update;

/// Router for one service: its product route plus `/health` and `/metrics`.
pub fn build_router<R>(kind: ServiceKind, repo: Arc<R>) -> Router
where
    R: ProductRepository + 'static,
{
    let api = match kind {
        ServiceKind::Create => create::router(Arc::new(CreateProductService::new(repo))),
        ServiceKind::Read => read::router(Arc::new(ReadProductService::new(repo))),
        ServiceKind::Update => update::router(Arc::new(UpdateProductService::new(repo))),
        ServiceKind::Delete => delete::router(Arc::new(DeleteProductService::new(repo))),
    };
    with_ambient_routes(kind, api)
}

/// `/products/` with an empty id segment; the id is malformed, so 400.
pub(crate) async fn empty_id() -> JsonApiError {
    JsonApiError::invalid_id()
}

/// Health and metrics routes, request metrics, CORS and access logging.
pub fn with_ambient_routes(kind: ServiceKind, api: Router) -> Router {
    Lazy::force(&observability::REQUESTS_TOTAL);
    Lazy::force(&observability::REQUEST_DURATION);

    Router::new()
        .route("/health", get(move || async move { kind.health_message() }))
        .route("/metrics", get(observability::metrics))
        .merge(api)
        .layer(middleware::from_fn_with_state(kind, observability::track_requests))
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx is logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
