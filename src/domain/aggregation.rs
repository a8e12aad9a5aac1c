//! Query orchestration: fetch a host's properties, filter them, record them

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::properties::{filter_properties, PropertyMap},
    errors::AppError,
    inventory::{InventoryList, InventoryStore},
    metrics::QueryMetrics,
    system_client::PropertySource,
};

#[derive(Clone)]
pub struct InventoryService {
    source: Arc<dyn PropertySource>,
    store: Arc<InventoryStore>,
    metrics: QueryMetrics,
}

impl InventoryService {
    pub fn new(
        source: Arc<dyn PropertySource>,
        store: Arc<InventoryStore>,
        metrics: QueryMetrics,
    ) -> Self {
        Self {
            source,
            store,
            metrics,
        }
    }

    /// Fetches `hostname`, keeps `requested_keys` plus the fixed keys and stores the
    /// result. The inventory is untouched when the host cannot be reached.
    pub async fn query(
        &self,
        hostname: &str,
        requested_keys: &[String],
    ) -> Result<PropertyMap, AppError> {
        self.metrics.queries_total.inc();
        let _timer = self.metrics.query_duration_seconds.start_timer();

        let Some(remote) = self.source.fetch(hostname).await else {
            warn!(hostname, "host unavailable, inventory left unchanged");
            return Err(AppError::host_unavailable(hostname));
        };

        let filtered = filter_properties(&remote, requested_keys);
        self.store.add(hostname, filtered.clone()).await;
        info!(
            hostname,
            requested = requested_keys.len(),
            stored = filtered.len(),
            "host properties recorded"
        );

        Ok(filtered)
    }

    pub async fn list(&self) -> InventoryList {
        self.store.list().await
    }

    pub async fn reset(&self) {
        self.store.reset().await;
        info!("inventory reset");
    }
}

/// Decodes the query payload, a JSON array of property keys.
pub fn parse_requested_keys(body: &[u8]) -> Result<Vec<String>, AppError> {
    serde_json::from_slice::<Vec<String>>(body).map_err(|err| {
        AppError::bad_request(format!(
            "request body must be a JSON array of property keys: {err}"
        ))
    })
}
