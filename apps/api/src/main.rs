mod config;
mod errors;
mod generation;
mod render;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{BlobStore, FsStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Poster & Moodboard Generator API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Bootstrap the three flat-file artifact stores.
    let backgrounds: Arc<dyn BlobStore> = Arc::new(FsStore::open(config.backgrounds_dir()).await?);
    let outputs: Arc<dyn BlobStore> = Arc::new(FsStore::open(config.outputs_dir()).await?);
    let uploads: Arc<dyn BlobStore> = Arc::new(FsStore::open(config.uploads_dir()).await?);

    let state = AppState {
        backgrounds,
        outputs,
        uploads,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
