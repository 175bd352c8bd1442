//! # slactac Protocols
//!
//! Interface definitions for the slactac label-override engine.
//! Contains only traits and plain data types - no implementations.
//!
//! ## Core Traits
//!
//! - [`LabelDom`] - Read and rewrite label elements in a host page
//! - [`MutationSource`] - Subscribe to structural changes of the page
//! - [`PointerSurface`] - Geometry, overlays, cursor and pointer interception
//! - [`KeyValueStore`] - Asynchronous persistence tier
//! - [`MessageTransport`] / [`UiNotifier`] - Cross-context messaging

pub mod dom;
pub mod error;
pub mod messaging;
pub mod storage;
pub mod types;

pub use dom::{
    BoundingBox, LabelDom, ListenerId, MutationBatch, MutationRecord, MutationSource, ObserverId,
    Page, PointerEvent, PointerSurface, ViewportInfo, WeakNode,
};
pub use error::{MessagingError, StorageError};
pub use messaging::{
    Action, MessageResponse, MessageSender, MessageTransport, RuntimeMessage, UiMessage,
    UiNotifier,
};
pub use storage::{KeyValueStore, Storage, StoreTier};
pub use types::*;
