//! HTTP transport layer for the inventory service
//!
//! Provides the external API routing for host queries and inventory administration.

pub mod handlers;
