//! # slactac Store
//!
//! Persistence tiers for the override dictionary and picker state.
//!
//! - [`MemoryStore`] keeps values in process memory (tests, simulation)
//! - [`FileStore`] keeps one JSON object file per tier

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::Path;
use std::sync::Arc;

use slactac_protocols::{Storage, StorageError, StoreTier};

/// Both tiers in memory.
pub fn memory_storage() -> Storage {
    Storage::new(
        Arc::new(MemoryStore::new(StoreTier::Sync.to_string())),
        Arc::new(MemoryStore::new(StoreTier::Local.to_string())),
    )
}

/// Both tiers as `<dir>/sync.json` and `<dir>/local.json`.
pub async fn file_storage(dir: impl AsRef<Path>) -> Result<Storage, StorageError> {
    let dir = dir.as_ref();
    let sync = FileStore::open(dir.join(format!("{}.json", StoreTier::Sync))).await?;
    let local = FileStore::open(dir.join(format!("{}.json", StoreTier::Local))).await?;
    Ok(Storage::new(Arc::new(sync), Arc::new(local)))
}
