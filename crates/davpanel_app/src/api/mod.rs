//! JSON API over the control panel.

pub mod dto;
mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use davpanel_engine::ControlPanel;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub panel: Arc<ControlPanel>,
    pub default_min_size_mb: u64,
}

impl AppState {
    pub fn new(panel: Arc<ControlPanel>, default_min_size_mb: u64) -> Self {
        Self {
            panel,
            default_min_size_mb,
        }
    }
}

/// Build the router for the panel API.
pub fn create_router(state: &AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/connect/webdav", post(handlers::connect_webdav))
        .route("/api/connect/aria2", post(handlers::connect_aria2))
        .route("/api/status", get(handlers::connection_status))
        .route("/api/files", get(handlers::list_files))
        .route("/api/download", post(handlers::add_downloads))
        .route("/api/aria2/status", get(handlers::aria2_status))
        .route("/api/aria2/downloads", get(handlers::aria2_downloads))
        .route("/api/aria2/pause/:gid", post(handlers::pause_download))
        .route("/api/aria2/resume/:gid", post(handlers::resume_download))
        .route("/api/aria2/remove/:gid", delete(handlers::remove_download))
        .with_state(state.clone())
}
