//! Element nodes of the in-memory page.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use slactac_protocols::{BoundingBox, WeakNode};

/// Shared handle to an element. Equality is identity.
#[derive(Clone)]
pub struct Element(pub(crate) Arc<ElementInner>);

/// Non-owning handle to an element.
#[derive(Clone)]
pub struct WeakElement(Weak<ElementInner>);

pub(crate) struct ElementInner {
    tag: String,
    pub(crate) state: RwLock<ElementState>,
}

#[derive(Default)]
pub(crate) struct ElementState {
    pub(crate) classes: Vec<String>,
    pub(crate) text: String,
    pub(crate) data: HashMap<String, String>,
    pub(crate) rect: BoundingBox,
    pub(crate) hidden: bool,
    pub(crate) z_index: i32,
    pub(crate) children: Vec<Element>,
    pub(crate) parent: Option<Weak<ElementInner>>,
}

impl Element {
    /// Create a detached element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Arc::new(ElementInner {
            tag: tag.into(),
            state: RwLock::new(ElementState::default()),
        }))
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.0.state.write().classes.push(class.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.0.state.write().text = text.into();
        self
    }

    pub fn with_rect(self, rect: BoundingBox) -> Self {
        self.0.state.write().rect = rect;
        self
    }

    pub fn with_z_index(self, z_index: i32) -> Self {
        self.0.state.write().z_index = z_index;
        self
    }

    /// Attach `child` without notifying observers. For building trees
    /// before they are inserted into a page.
    pub fn with_child(self, child: Element) -> Self {
        self.attach(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.state.read().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.state.read().classes.iter().any(|c| c == class)
    }

    /// Text owned directly by this element.
    pub fn own_text(&self) -> String {
        self.0.state.read().text.clone()
    }

    /// Own text followed by the text of all descendants.
    pub fn text_content(&self) -> String {
        let (mut text, children) = {
            let state = self.0.state.read();
            (state.text.clone(), state.children.clone())
        };
        for child in children {
            text.push_str(&child.text_content());
        }
        text
    }

    pub fn data(&self, key: &str) -> Option<String> {
        self.0.state.read().data.get(key).cloned()
    }

    pub fn set_data(&self, key: &str, value: &str) {
        self.0
            .state
            .write()
            .data
            .insert(key.to_string(), value.to_string());
    }

    pub fn rect(&self) -> BoundingBox {
        self.0.state.read().rect
    }

    pub fn set_rect(&self, rect: BoundingBox) {
        self.0.state.write().rect = rect;
    }

    pub fn is_hidden(&self) -> bool {
        self.0.state.read().hidden
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.0.state.write().hidden = hidden;
    }

    pub fn z_index(&self) -> i32 {
        self.0.state.read().z_index
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.state.read().children.clone()
    }

    pub fn parent(&self) -> Option<Element> {
        self.0
            .state
            .read()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Element)
    }

    /// Whether `self` is `other` or one of its ancestors.
    pub fn is_ancestor_of(&self, other: &Element) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Descendants in document order (pre-order), excluding `self`.
    pub fn descendants(&self) -> Vec<Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Element>) {
        for child in self.children() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    pub(crate) fn attach(&self, child: Element) {
        if let Some(previous) = child.parent() {
            previous.detach(&child);
        }
        child.0.state.write().parent = Some(Arc::downgrade(&self.0));
        self.0.state.write().children.push(child);
    }

    pub(crate) fn detach(&self, child: &Element) -> bool {
        let removed = {
            let mut state = self.0.state.write();
            let before = state.children.len();
            state.children.retain(|c| c != child);
            before != state.children.len()
        };
        if removed {
            child.0.state.write().parent = None;
        }
        removed
    }

    /// Replace own text and drop all children. Returns the dropped children.
    pub(crate) fn replace_text(&self, text: &str) -> Vec<Element> {
        let removed = {
            let mut state = self.0.state.write();
            state.text = text.to_string();
            std::mem::take(&mut state.children)
        };
        for child in &removed {
            child.0.state.write().parent = None;
        }
        removed
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.state.read();
        f.debug_struct("Element")
            .field("tag", &self.0.tag)
            .field("classes", &state.classes)
            .field("text", &state.text)
            .finish()
    }
}

impl WeakNode for Element {
    type Weak = WeakElement;

    fn downgrade(&self) -> WeakElement {
        WeakElement(Arc::downgrade(&self.0))
    }

    fn upgrade(weak: &WeakElement) -> Option<Self> {
        weak.0.upgrade().map(Element)
    }

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}
