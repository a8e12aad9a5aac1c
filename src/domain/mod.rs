//! Property filtering and query orchestration
//!
//! Provides the core business logic of aggregating remote host properties into the inventory

pub mod aggregation;
pub mod properties;
