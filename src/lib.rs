use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod inventory;
pub mod logging;
pub mod metrics;
pub mod system;
pub mod system_client;

use domain::aggregation::InventoryService;
use inventory::InventoryStore;
use metrics::QueryMetrics;
use system_client::PropertySource;

#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub metrics: QueryMetrics,
}

impl AppState {
    pub fn new(
        source: Arc<dyn PropertySource>,
        store: Arc<InventoryStore>,
        metrics: QueryMetrics,
    ) -> Self {
        Self {
            inventory: InventoryService::new(source, store, metrics.clone()),
            metrics,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::discovery))
        .route("/health", get(http::handlers::health))
        .route("/metrics", get(http::handlers::metrics))
        .route("/system/properties", get(http::handlers::system_properties))
        .route("/systems", get(http::handlers::list_inventory))
        .route("/systems/reset", post(http::handlers::reset_inventory))
        .route("/systems/{hostname}", post(http::handlers::query_host))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
