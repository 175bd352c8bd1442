//! Persistence protocol definitions.
//!
//! Persistence is a key-value store whose operations are asynchronous and
//! independently fallible. Two tiers exist: a synchronized tier holding the
//! override dictionary and a device-local tier for ephemeral UI state such
//! as the last picked channel name.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;

/// Core trait for persistence tiers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Read a value. `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Which persistence tier a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreTier {
    /// Synchronized across devices, last writer wins.
    Sync,
    /// This device only.
    Local,
}

impl fmt::Display for StoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync => f.write_str("sync"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Both persistence tiers.
#[derive(Clone)]
pub struct Storage {
    sync: Arc<dyn KeyValueStore>,
    local: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(sync: Arc<dyn KeyValueStore>, local: Arc<dyn KeyValueStore>) -> Self {
        Self { sync, local }
    }

    pub fn tier(&self, tier: StoreTier) -> &Arc<dyn KeyValueStore> {
        match tier {
            StoreTier::Sync => &self.sync,
            StoreTier::Local => &self.local,
        }
    }

    pub fn sync(&self) -> &Arc<dyn KeyValueStore> {
        &self.sync
    }

    pub fn local(&self) -> &Arc<dyn KeyValueStore> {
        &self.local
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("sync", &self.sync.id())
            .field("local", &self.local.id())
            .finish()
    }
}
