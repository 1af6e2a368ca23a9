use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use davpanel_app::{config_path, create_router, load_config, logging, AppConfig, AppState};
use davpanel_engine::ControlPanel;
use panel_logging::{panel_info, panel_warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_path();
    let (config, config_error) = match load_config(&path) {
        Ok(loaded) => (loaded.unwrap_or_default(), None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    logging::initialize(
        config.log_destination,
        panel_logging::parse_level(&config.log_level),
        &config.log_file,
    );
    if let Some(err) = config_error {
        panel_warn!("{:#}; using defaults", err);
    }

    let address: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address))?;

    let panel = Arc::new(ControlPanel::new(config.client_settings()));
    let state = AppState::new(panel, config.default_min_size_mb);
    let router = create_router(&state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("binding {address}"))?;
    panel_info!("davpanel listening on http://{}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;
    panel_info!("davpanel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        panel_warn!("cannot listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
