use crate::state::NestedRouter;
use axum::routing::get;

mod blog;
mod live;

pub fn route() -> NestedRouter {
    let page_compression_layer = tower_http::compression::CompressionLayer::new().br(true);

    axum::Router::new()
        .route("/blogs/:slug", get(blog::get).layer(page_compression_layer))
        .route("/blogs/:slug/live", get(live::get))
}
