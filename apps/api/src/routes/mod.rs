pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route("/health", get(health::health_handler))
        .route("/upload-background", post(handlers::handle_upload_background))
        .route(
            "/generate-quote-poster",
            post(handlers::handle_generate_quote_poster),
        )
        .route(
            "/generate-moodboard",
            post(handlers::handle_generate_moodboard),
        )
        .route("/download/:filename", get(handlers::handle_download))
        .route("/backgrounds", get(handlers::handle_list_backgrounds))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}
