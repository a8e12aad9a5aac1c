//! Prometheus metrics for host queries

use std::sync::Arc;

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Encoder, Histogram,
    IntCounter, Registry, TextEncoder,
};

use crate::errors::AppError;

#[derive(Clone)]
pub struct QueryMetrics {
    /// Every call to the query endpoint, successful or not.
    pub queries_total: IntCounter,
    pub query_duration_seconds: Histogram,
    registry: Arc<Registry>,
}

impl QueryMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let queries_total = register_int_counter_with_registry!(
            "inventory_query_properties_total",
            "Number of times host properties were queried",
            registry
        )?;

        let query_duration_seconds = register_histogram_with_registry!(
            "inventory_query_properties_seconds",
            "Time needed to query host properties",
            vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0],
            registry
        )?;

        Ok(Self {
            queries_total,
            query_duration_seconds,
            registry: Arc::new(registry),
        })
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, AppError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|err| AppError::internal(format!("failed to encode metrics: {err}")))?;
        String::from_utf8(buffer)
            .map_err(|err| AppError::internal(format!("metrics are not utf-8: {err}")))
    }
}
