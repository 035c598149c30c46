use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints the browser hits directly besides the shell itself: the health
/// probe and the split view chunks fetched on first navigation to a lazy route.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /chunks/{chunk}
        // One deferred view bundle, e.g. /chunks/about.
        .route("/chunks/{chunk}", get(handlers::get_chunk))
}
