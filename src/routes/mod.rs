use crate::state::{NestedRouter, State};
use axum::routing::get;
use std::sync::Arc;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

pub mod page;

pub fn route() -> NestedRouter {
    axum::Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(page::route())
}

/// The whole service, middleware included.
pub fn app(state: Arc<State>, cors: CorsLayer) -> NormalizePath<axum::Router> {
    NormalizePathLayer::trim_trailing_slash().layer(
        route()
            .with_state(state)
            .layer(cors)
            .layer(TraceLayer::new_for_http()),
    )
}
