//! In-memory store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use slactac_protocols::{KeyValueStore, StorageError};

/// In-memory key-value store.
///
/// Can be switched into an unavailable state to exercise failure paths.
pub struct MemoryStore {
    id: String,
    values: RwLock<HashMap<String, Value>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create a new memory store.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("store '{}' is offline", self.id)));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        self.check()?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.check()?;
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.values.write().await.remove(key);
        Ok(())
    }
}
