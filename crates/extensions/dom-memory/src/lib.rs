//! # slactac DOM (memory)
//!
//! An in-memory host page implementing every page protocol trait:
//!
//! - element tree with classes, plain text, `dataset` style data and geometry
//! - hit testing with z-order, overlay nodes, document cursor
//! - mutation observers fed on every structural change
//! - pointer listeners that intercept clicks while registered
//!
//! Pages can be built in code or loaded from JSON fixtures.

mod element;
mod fixture;
mod page;

pub use element::{Element, WeakElement};
pub use fixture::{FixtureError, NodeFixture, PageFixture};
pub use page::MemoryPage;

/// Class carried by picker overlay nodes.
pub const OVERLAY_CLASS: &str = "slactac-picker-overlay";
