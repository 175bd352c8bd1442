//! Error types for the slactac protocol layer.

mod messaging;
mod storage;

pub use messaging::*;
pub use storage::*;
