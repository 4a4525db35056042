//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let files = ServeDir::new(&state.downloads_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Album JSON API
        .route("/api/album/:model", get(handlers::album))
        .route("/api/album/:model/:index", get(handlers::album_indexed))
        // Image proxy and cached gallery page
        .route("/api/nsfw/:model", get(handlers::random_image))
        .route("/api/nsfw/:model/:index", get(handlers::gallery))
        // Downloads
        .route("/download/:model/:image_id", get(handlers::download_image))
        .route(
            "/download/:model/:index/:image_id",
            get(handlers::download_image_indexed),
        )
        .route("/bulk-download/:model", get(handlers::bulk_download))
        .route(
            "/bulk-download/:model/:index",
            get(handlers::bulk_download_indexed),
        )
        .route("/downloads/:model", get(handlers::list_downloads))
        .nest_service("/files", files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
