//! JSON file store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use slactac_protocols::{KeyValueStore, StorageError};

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;

/// File backed key-value store.
///
/// All keys of one tier live in a single JSON object:
/// ```text
/// {data_dir}/
/// ├── sync.json    {"chatRoomOverrides": {...}}
/// └── local.json   {"lastPickedChannel": "..."}
/// ```
/// Writes go to a temporary sibling first and are renamed into place.
pub struct FileStore {
    id: String,
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or prepare) the store file at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Unavailable(format!("{}: {}", parent.display(), e)))?;
        }

        debug!("FileStore '{}' opened at {:?}", id, path);
        Ok(Self {
            id,
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_all(&self, key: &str) -> Result<Map<String, Value>, StorageError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::read(key, e))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::read(key, "store file is not a JSON object")),
            Err(e) => Err(StorageError::read(key, e)),
        }
    }

    async fn write_all(&self, key: &str, map: Map<String, Value>) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(&Value::Object(map))
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        let temp = self.temp_path();
        fs::write(&temp, encoded)
            .await
            .map_err(|e| StorageError::write(key, e))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StorageError::write(key, e))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    fn id(&self) -> &str {
        &self.id
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let map = self.read_all(key).await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_all(key).await?;
        map.insert(key.to_string(), value);
        self.write_all(key, map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_all(key).await?;
        if map.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(key, map).await
    }
}
