//! # slactac Core
//!
//! The label-override engine.
//!
//! ## Components
//!
//! - [`OverrideReconciler`] - Rewrites label text from the override dictionary
//! - [`ChangeDetector`] - Debounces page mutations into reconciliation passes
//! - [`Picker`] - Click-to-capture a label's original text
//! - [`Engine`] - One instance per page wiring the above to storage and messaging
//! - [`TackBook`] - Configuration surface over the persisted dictionary
//!
//! Nothing on the engine's event paths fails the host page: storage and
//! messaging failures are logged and the affected pass or message is skipped.

pub mod detector;
pub mod engine;
pub mod error;
pub mod notify;
pub mod origin;
pub mod picker;
pub mod reconciler;
pub mod router;
pub mod sanitize;
pub mod tacks;
pub mod transport;

pub use detector::ChangeDetector;
pub use engine::{Engine, EngineState};
pub use error::{PickerError, TackError};
pub use notify::ChannelNotifier;
pub use origin::{DatasetOriginTags, OriginTags, WeakOriginTable};
pub use picker::{Activation, PickOutcome, Picker};
pub use reconciler::{OverrideReconciler, PassReport, Reconcile};
pub use router::MessageGuard;
pub use sanitize::Sanitizer;
pub use tacks::TackBook;
pub use transport::LocalTransport;
