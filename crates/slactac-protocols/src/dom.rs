//! Page (DOM) protocol definitions.
//!
//! The engine never talks to a concrete document. A host page is described
//! by three capability traits:
//!
//! - [`LabelDom`]: find label elements, read and write their plain text and
//!   attach per-node data
//! - [`MutationSource`]: one subscribe/unsubscribe pair delivering batches of
//!   structural mutation records
//! - [`PointerSurface`]: hit testing, geometry, overlay nodes, cursor and
//!   pointer interception for the picker
//!
//! [`Page`] is the union of all three.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;

/// Handle returned by [`MutationSource::observe`].
pub type ObserverId = u64;

/// Handle returned by [`PointerSurface::listen_pointer`].
pub type ListenerId = u64;

/// Viewport information for coordinate calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportInfo {
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
}

impl Default for ViewportInfo {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Bounding box for an element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this bounding box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Clamp negative extents to zero.
    pub fn normalized(self) -> Self {
        Self {
            width: self.width.max(0.0),
            height: self.height.max(0.0),
            ..self
        }
    }
}

/// One structural change observed under a subscribed subtree.
#[derive(Debug, Clone)]
pub struct MutationRecord<N> {
    /// Node whose child list (or text) changed.
    pub target: N,
    /// Nodes inserted under `target`.
    pub added: Vec<N>,
    /// Nodes detached from `target`. Already detached when delivered.
    pub removed: Vec<N>,
}

impl<N> MutationRecord<N> {
    pub fn added(target: N, added: Vec<N>) -> Self {
        Self {
            target,
            added,
            removed: Vec::new(),
        }
    }

    pub fn removed(target: N, removed: Vec<N>) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed,
        }
    }

    /// A record that touched neither child list (character data change).
    pub fn text(target: N) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// Records delivered together in one observer callback.
pub type MutationBatch<N> = Vec<MutationRecord<N>>;

/// Pointer input intercepted while the picker is listening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Click { x: f64, y: f64 },
}

/// Read/write access to label elements.
///
/// All text access is plain text. Implementations must never parse a value
/// passed to [`LabelDom::set_text`] as markup.
pub trait LabelDom: Send + Sync {
    /// Node handle. Equality is node identity, not structural equality.
    type Node: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// First element in document order carrying `class`.
    fn first_by_class(&self, class: &str) -> Option<Self::Node>;

    /// Descendants of `scope` (the whole document when `None`) carrying
    /// `class`, in document order. The scope itself is not included.
    fn find_by_class(&self, scope: Option<&Self::Node>, class: &str) -> Vec<Self::Node>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Visible text of the node.
    fn text(&self, node: &Self::Node) -> String;

    /// Replace the node's content with a single plain-text value.
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Per-node data attribute (`dataset` style).
    fn data(&self, node: &Self::Node, key: &str) -> Option<String>;

    fn set_data(&self, node: &Self::Node, key: &str, value: &str);
}

/// Structural mutation subscription.
pub trait MutationSource: LabelDom {
    /// Start delivering mutation batches for the whole document to `sink`.
    fn observe(&self, sink: mpsc::UnboundedSender<MutationBatch<Self::Node>>) -> ObserverId;

    /// Stop delivering to the sink registered under `id`. Unknown ids are ignored.
    fn disconnect(&self, id: ObserverId);
}

/// Geometry, overlays and pointer interception used by the picker.
pub trait PointerSurface: LabelDom {
    /// Hostname of the page (e.g. `app.slack.com`).
    fn hostname(&self) -> String;

    fn viewport(&self) -> ViewportInfo;

    /// Topmost visible element under the point.
    fn element_at(&self, x: f64, y: f64) -> Option<Self::Node>;

    fn bounding_box(&self, node: &Self::Node) -> BoundingBox;

    /// Create a detached-from-layout overlay rectangle owned by the caller.
    fn create_overlay(&self) -> Self::Node;

    fn place_overlay(&self, overlay: &Self::Node, rect: BoundingBox);

    fn set_hidden(&self, node: &Self::Node, hidden: bool);

    fn remove_node(&self, node: &Self::Node);

    /// Current document cursor style.
    fn cursor(&self) -> String;

    fn set_cursor(&self, cursor: &str);

    /// Intercept pointer movement and clicks over the whole page.
    ///
    /// While a listener is registered, clicks must not reach the page's
    /// default handling.
    fn listen_pointer(&self, sink: mpsc::UnboundedSender<PointerEvent>) -> ListenerId;

    /// Remove a pointer listener and drop its sink. Unknown ids are ignored.
    fn unlisten_pointer(&self, id: ListenerId);
}

/// A complete host page.
pub trait Page: MutationSource + PointerSurface {}

impl<T: MutationSource + PointerSurface> Page for T {}

/// Nodes that can be referenced without keeping them alive.
pub trait WeakNode: Sized {
    type Weak: Send + Sync;

    fn downgrade(&self) -> Self::Weak;

    fn upgrade(weak: &Self::Weak) -> Option<Self>;

    /// Identity key, stable while the node is alive. May be reused after
    /// the node is dropped.
    fn identity(&self) -> usize;
}
