//! Axum HTTP handlers for the web server
//!
//! Provides the host query, inventory administration, local properties, and
//! general metadata endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::domain::{aggregation::parse_requested_keys, properties::PropertyMap};
use crate::{errors::AppError, inventory::InventoryList, system::local_properties, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub systems_endpoint: &'static str,
    pub reset_endpoint: &'static str,
    pub properties_endpoint: &'static str,
    pub metrics_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        systems_endpoint: "/systems",
        reset_endpoint: "/systems/reset",
        properties_endpoint: "/system/properties",
        metrics_endpoint: "/metrics",
    })
}

pub async fn system_properties() -> Json<PropertyMap> {
    Json(local_properties())
}

pub async fn query_host(
    State(state): State<AppState>,
    Path(hostname): Path<String>,
    body: Bytes,
) -> Result<Json<PropertyMap>, AppError> {
    let requested_keys = parse_requested_keys(&body)?;
    let properties = state.inventory.query(&hostname, &requested_keys).await?;
    Ok(Json(properties))
}

pub async fn list_inventory(State(state): State<AppState>) -> Json<InventoryList> {
    Json(state.inventory.list().await)
}

pub async fn reset_inventory(State(state): State<AppState>) -> StatusCode {
    state.inventory.reset().await;
    StatusCode::NO_CONTENT
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.export()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
