use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Route table, views and the deferred loading behind them.
pub mod chunks;
pub mod navigation;
pub mod route_table;
pub mod views;

// HTTP surface and shared schemas.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
use routes::{api, public};

// --- Public Re-exports ---

pub use chunks::{ChunkState, ChunkStore, FsChunkStore, LazyComponent, MockChunkStore};
pub use config::AppConfig;
pub use error::{ChunkError, NavigationError};
pub use navigation::{Navigation, Navigator};
pub use route_table::{Component, Route, RouteTable};

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::list_routes, handlers::resolve_route, handlers::get_chunk),
    components(
        schemas(models::RouteInfo, models::Resolution, models::ViewChunk, models::LoadKind)
    ),
    tags(
        (name = "cbbpoll-web", description = "Poll site route table and view chunks")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable state: the navigator (route table plus chunk store), the
/// chunk store itself for direct chunk requests, and the configuration.
#[derive(Clone)]
pub struct AppState {
    pub navigator: Navigator,
    pub chunks: ChunkState,
    pub config: AppConfig,
}

impl AppState {
    /// Builds the state around `table`, logging any naming problems found in it.
    pub fn new(table: RouteTable, chunks: ChunkState, config: AppConfig) -> Self {
        for name in table.duplicate_names() {
            tracing::warn!(name, "route name registered more than once");
        }
        for (name, path) in table.suspicious_names() {
            tracing::warn!(name, path, "route name does not match its path");
        }

        let navigator = Navigator::new(Arc::new(table), chunks.clone());
        Self {
            navigator,
            chunks,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for Navigator {
    fn from_ref(app_state: &AppState) -> Navigator {
        app_state.navigator.clone()
    }
}

impl FromRef<AppState> for ChunkState {
    fn from_ref(app_state: &AppState) -> ChunkState {
        app_state.chunks.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Fixed endpoints first, then the history-mode fallback that renders the shell
/// for every other path. Request id, tracing and CORS layers wrap everything.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI over the generated OpenAPI document.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Health probe and chunk delivery.
        .merge(public::public_routes())
        // Route table API, nested under '/api'.
        .nest("/api", api::api_routes())
        // History mode: every unclaimed path is resolved against the route table
        // and answered with the rendered shell.
        .fallback(handlers::render_location)
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. A UUID request id for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. One tracing span per request, carrying the request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Echo the x-request-id header back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (applied last)
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to build the request span. It pulls the
/// `x-request-id` header (if present) so every log line of one request can be
/// correlated, alongside the HTTP method and URI.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    // The structured log format used by the tracing macros.
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn app_state_warns_about_misnamed_routes() {
        let chunks = Arc::new(MockChunkStore::new()) as ChunkState;
        let _state = AppState::new(RouteTable::poll_site(), chunks, AppConfig::default());

        assert!(logs_contain("route name does not match its path"));
        assert!(logs_contain("reults"));
        assert!(!logs_contain("route name registered more than once"));
    }

    #[test]
    #[traced_test]
    fn app_state_warns_about_duplicate_names() {
        let table = RouteTable::new(vec![
            Route::lazy("/teams", "teams", "teams"),
            Route::lazy("/squads", "teams", "teams"),
        ]);
        let chunks = Arc::new(MockChunkStore::new()) as ChunkState;
        let _state = AppState::new(table, chunks, AppConfig::default());

        assert!(logs_contain("route name registered more than once"));
    }
}
