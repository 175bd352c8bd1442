//! Configuration surface over the persisted override dictionary.
//!
//! A "tack" is one original → replacement pair. Every successful change
//! asks the engine for an immediate refresh when a transport is attached.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use slactac_config::{Config, ConfigError};
use slactac_protocols::{Action, MessageTransport, OverrideDictionary, RuntimeMessage, Storage};

use crate::error::TackError;
use crate::sanitize::Sanitizer;

/// Add, remove and list override pairs.
pub struct TackBook {
    storage: Storage,
    sanitizer: Sanitizer,
    overrides_key: String,
    last_picked_key: String,
    transport: Option<Arc<dyn MessageTransport>>,
}

impl TackBook {
    pub fn new(storage: Storage, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            storage,
            sanitizer: Sanitizer::from_config(&config.security)?,
            overrides_key: config.storage.overrides_key.clone(),
            last_picked_key: config.storage.last_picked_key.clone(),
            transport: None,
        })
    }

    /// Send a refresh request through `transport` after every change.
    pub fn with_transport(mut self, transport: Arc<dyn MessageTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Insert or overwrite one pair. Both sides are trimmed.
    pub async fn save(&self, original: &str, replacement: &str) -> Result<(), TackError> {
        let original = original.trim();
        let replacement = replacement.trim();
        if original.is_empty() {
            return Err(TackError::MissingField("original"));
        }
        if replacement.is_empty() {
            return Err(TackError::MissingField("replacement"));
        }
        if !self.sanitizer.is_safe(replacement) {
            return Err(TackError::UnsafeValue(replacement.to_string()));
        }

        let mut entries = self.read_raw().await?;
        entries.insert(original.to_string(), Value::String(replacement.to_string()));
        self.write_raw(entries).await?;

        info!("Saved tack '{}' -> '{}'", original, replacement);
        self.request_refresh().await;
        Ok(())
    }

    /// Delete one pair. Returns false when it did not exist.
    pub async fn remove(&self, original: &str) -> Result<bool, TackError> {
        let mut entries = self.read_raw().await?;
        if entries.remove(original.trim()).is_none() {
            debug!("No tack for '{}'", original.trim());
            return Ok(false);
        }
        self.write_raw(entries).await?;

        info!("Removed tack '{}'", original.trim());
        self.request_refresh().await;
        Ok(true)
    }

    /// The dictionary as the engine would apply it, sorted by original.
    pub async fn list(&self) -> Result<OverrideDictionary, TackError> {
        let snapshot = self.storage.sync().get(&self.overrides_key).await?;
        Ok(self.sanitizer.sanitize(snapshot))
    }

    /// Remove every pair.
    pub async fn clear_all(&self) -> Result<(), TackError> {
        self.storage.sync().remove(&self.overrides_key).await?;
        info!("Cleared all tacks");
        self.request_refresh().await;
        Ok(())
    }

    /// Name captured by the most recent pick, if any.
    pub async fn last_picked(&self) -> Result<Option<String>, TackError> {
        let value = self.storage.local().get(&self.last_picked_key).await?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    /// Read and forget the last picked name.
    pub async fn take_last_picked(&self) -> Result<Option<String>, TackError> {
        let picked = self.last_picked().await?;
        if picked.is_some() {
            self.storage.local().remove(&self.last_picked_key).await?;
        }
        Ok(picked)
    }

    async fn read_raw(&self) -> Result<Map<String, Value>, TackError> {
        match self.storage.sync().get(&self.overrides_key).await? {
            Some(Value::Object(entries)) => Ok(entries),
            Some(_) => {
                warn!("Replacing malformed override dictionary");
                Ok(Map::new())
            }
            None => Ok(Map::new()),
        }
    }

    async fn write_raw(&self, entries: Map<String, Value>) -> Result<(), TackError> {
        self.storage
            .sync()
            .set(&self.overrides_key, Value::Object(entries))
            .await?;
        Ok(())
    }

    async fn request_refresh(&self) {
        let Some(transport) = &self.transport else {
            return;
        };
        match transport.request(RuntimeMessage::new(Action::RefreshNames)).await {
            Ok(response) => debug!("Refresh requested: {}", response.status),
            Err(e) => warn!("Could not request refresh: {}", e),
        }
    }
}

#[cfg(test)]
#[path = "tacks_tests.rs"]
mod tests;
