use cbbpoll_web::{
    AppState,
    chunks::{ChunkState, FsChunkStore},
    config::{AppConfig, Env},
    create_router,
    route_table::RouteTable,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 1. Configuration
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise debug for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cbbpoll_web=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Shell server starting in {:?} mode", config.env);

    // 3. Chunk store and route table
    let store = FsChunkStore::new(&config.chunk_dir);
    if !store.root().is_dir() {
        tracing::warn!(dir = %store.root().display(), "chunk directory missing; lazy routes will fail to load");
    }
    let chunks = Arc::new(store) as ChunkState;
    let table = RouteTable::poll_site();
    tracing::info!(routes = table.len(), "route table built");

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(table, chunks, config));

    // 4. Server
    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: failed to bind {bind_addr}: {e}"));

    tracing::info!("Listening on {}", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server terminated");
        std::process::exit(1);
    }
}
