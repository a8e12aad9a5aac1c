//! In-memory inventory of queried hosts
//!
//! All access goes through a single `RwLock`, so `list` always observes the whole
//! store as it existed between two writes.

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::properties::PropertyMap;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SystemEntry {
    pub hostname: String,
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InventoryList {
    pub total: usize,
    pub systems: Vec<SystemEntry>,
}

#[derive(Debug, Default)]
pub struct InventoryStore {
    systems: RwLock<BTreeMap<String, PropertyMap>>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `properties` for `hostname`, replacing any previous entry wholesale.
    pub async fn add(&self, hostname: &str, properties: PropertyMap) {
        let mut systems = self.systems.write().await;
        let replaced = systems
            .insert(hostname.to_string(), properties)
            .is_some();
        debug!(hostname, replaced, total = systems.len(), "inventory updated");
    }

    /// Snapshot of every host, ordered by hostname.
    pub async fn list(&self) -> InventoryList {
        let systems = self.systems.read().await;
        let entries: Vec<SystemEntry> = systems
            .iter()
            .map(|(hostname, properties)| SystemEntry {
                hostname: hostname.clone(),
                properties: properties.clone(),
            })
            .collect();

        InventoryList {
            total: entries.len(),
            systems: entries,
        }
    }

    pub async fn reset(&self) {
        let mut systems = self.systems.write().await;
        let cleared = systems.len();
        systems.clear();
        debug!(cleared, "inventory reset");
    }
}
