use std::sync::Arc;

use system_inventory::{
    build_app, config::Config, inventory::InventoryStore, logging, metrics::QueryMetrics,
    system_client::HttpSystemClient, AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;

    let source = Arc::new(HttpSystemClient::from_config(&config)?);
    let store = Arc::new(InventoryStore::new());
    let bind_socket = config.bind_socket()?;
    let metrics = QueryMetrics::new()?;
    let state = AppState::new(source, store, metrics);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        system_protocol = %config.system_protocol,
        system_properties_path = %config.system_properties_path,
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
