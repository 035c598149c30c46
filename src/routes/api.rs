use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Route Table API
///
/// Read-only JSON view of the route table, nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/routes
        // The table in resolution order, with each route's load kind.
        .route("/routes", get(handlers::list_routes))
        // GET /api/resolve?path=/results
        // Resolves a location exactly like the shell fallback does.
        .route("/resolve", get(handlers::resolve_route))
}
