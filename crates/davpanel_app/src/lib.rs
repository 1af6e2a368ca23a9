//! Davpanel app: configuration, logger setup and the HTTP API.
pub mod api;
pub mod config;
pub mod logging;

pub use api::{create_router, AppState};
pub use config::{config_path, load_config, AppConfig};
pub use logging::LogDestination;
