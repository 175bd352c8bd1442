//! In-memory page.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::debug;

use slactac_protocols::{
    BoundingBox, LabelDom, ListenerId, MutationBatch, MutationRecord, MutationSource, ObserverId,
    PointerEvent, PointerSurface, ViewportInfo,
};

use crate::OVERLAY_CLASS;
use crate::element::Element;

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;

/// In-memory host page. Cloning shares the same document.
#[derive(Clone)]
pub struct MemoryPage {
    inner: Arc<PageInner>,
}

struct PageInner {
    hostname: String,
    viewport: RwLock<ViewportInfo>,
    body: Element,
    cursor: RwLock<String>,
    observers: Mutex<HashMap<ObserverId, mpsc::UnboundedSender<MutationBatch<Element>>>>,
    listeners: Mutex<HashMap<ListenerId, mpsc::UnboundedSender<PointerEvent>>>,
    next_id: AtomicU64,
    text_writes: AtomicUsize,
    page_clicks: AtomicUsize,
}

impl MemoryPage {
    /// Create an empty page whose body covers the viewport.
    pub fn new(hostname: impl Into<String>, viewport: ViewportInfo) -> Self {
        let body = Element::new("body").with_rect(BoundingBox::new(
            0.0,
            0.0,
            viewport.width,
            viewport.height,
        ));
        Self::with_body(hostname, viewport, body)
    }

    pub fn with_body(hostname: impl Into<String>, viewport: ViewportInfo, body: Element) -> Self {
        Self {
            inner: Arc::new(PageInner {
                hostname: hostname.into(),
                viewport: RwLock::new(viewport),
                body,
                cursor: RwLock::new("auto".to_string()),
                observers: Mutex::new(HashMap::new()),
                listeners: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                text_writes: AtomicUsize::new(0),
                page_clicks: AtomicUsize::new(0),
            }),
        }
    }

    pub fn body(&self) -> Element {
        self.inner.body.clone()
    }

    pub fn set_viewport(&self, viewport: ViewportInfo) {
        *self.inner.viewport.write() = viewport;
    }

    /// Insert `children` under `parent` as one mutation batch.
    pub fn append_children(&self, parent: &Element, children: Vec<Element>) {
        for child in &children {
            parent.attach(child.clone());
        }
        self.emit(vec![MutationRecord::added(parent.clone(), children)]);
    }

    pub fn append_child(&self, parent: &Element, child: Element) {
        self.append_children(parent, vec![child]);
    }

    /// Detach `child` from `parent`. Returns false when it was not a child.
    pub fn remove_child(&self, parent: &Element, child: &Element) -> bool {
        if !parent.detach(child) {
            return false;
        }
        self.emit(vec![MutationRecord::removed(parent.clone(), vec![child.clone()])]);
        true
    }

    /// Replace `old` with `new` in place, as a virtualized list does when it
    /// recycles rows.
    pub fn replace_child(&self, parent: &Element, old: &Element, new: Element) -> bool {
        if !parent.detach(old) {
            return false;
        }
        parent.attach(new.clone());
        self.emit(vec![MutationRecord {
            target: parent.clone(),
            added: vec![new],
            removed: vec![old.clone()],
        }]);
        true
    }

    /// Deliver a batch to every observer, dropping closed ones.
    pub fn emit(&self, batch: MutationBatch<Element>) {
        let mut observers = self.inner.observers.lock();
        observers.retain(|id, sink| {
            let open = sink.send(batch.clone()).is_ok();
            if !open {
                debug!("Dropping closed mutation observer {}", id);
            }
            open
        });
    }

    /// Simulate the user moving the pointer.
    pub fn move_pointer(&self, x: f64, y: f64) {
        self.dispatch_pointer(PointerEvent::Move { x, y });
    }

    /// Simulate a click. Returns true when the page's own click handling
    /// ran, false when a pointer listener intercepted it.
    pub fn click(&self, x: f64, y: f64) -> bool {
        let intercepted = self.dispatch_pointer(PointerEvent::Click { x, y });
        if !intercepted {
            self.inner.page_clicks.fetch_add(1, Ordering::SeqCst);
        }
        !intercepted
    }

    fn dispatch_pointer(&self, event: PointerEvent) -> bool {
        let mut listeners = self.inner.listeners.lock();
        listeners.retain(|_, sink| sink.send(event).is_ok());
        !listeners.is_empty()
    }

    /// Number of `set_text` calls made through [`LabelDom`].
    pub fn text_writes(&self) -> usize {
        self.inner.text_writes.load(Ordering::SeqCst)
    }

    /// Number of clicks the page handled itself.
    pub fn page_clicks(&self) -> usize {
        self.inner.page_clicks.load(Ordering::SeqCst)
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    pub fn overlays(&self) -> Vec<Element> {
        self.inner
            .body
            .children()
            .into_iter()
            .filter(|el| el.has_class(OVERLAY_CLASS))
            .collect()
    }

    /// Visible text of every element carrying `class`, in document order.
    pub fn texts_of(&self, class: &str) -> Vec<String> {
        self.find_by_class(None, class)
            .iter()
            .map(Element::text_content)
            .collect()
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Body plus all descendants in document order.
    fn all_elements(&self) -> Vec<Element> {
        let mut all = vec![self.inner.body.clone()];
        all.extend(self.inner.body.descendants());
        all
    }

    fn collect_hits(&self, node: &Element, depth: usize, x: f64, y: f64, hits: &mut Vec<Hit>) {
        if node.is_hidden() {
            return;
        }
        let rect = node.rect();
        if rect.area() > 0.0 && rect.contains(x, y) {
            hits.push(Hit {
                element: node.clone(),
                z_index: node.z_index(),
                depth,
                order: hits.len(),
            });
        }
        for child in node.children() {
            self.collect_hits(&child, depth + 1, x, y, hits);
        }
    }
}

struct Hit {
    element: Element,
    z_index: i32,
    depth: usize,
    order: usize,
}

impl LabelDom for MemoryPage {
    type Node = Element;

    fn first_by_class(&self, class: &str) -> Option<Element> {
        self.all_elements().into_iter().find(|el| el.has_class(class))
    }

    fn find_by_class(&self, scope: Option<&Element>, class: &str) -> Vec<Element> {
        let candidates = match scope {
            Some(scope) => scope.descendants(),
            None => self.all_elements(),
        };
        candidates.into_iter().filter(|el| el.has_class(class)).collect()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.has_class(class)
    }

    fn text(&self, node: &Element) -> String {
        node.text_content()
    }

    fn set_text(&self, node: &Element, text: &str) {
        self.inner.text_writes.fetch_add(1, Ordering::SeqCst);
        let removed = node.replace_text(text);
        let record = if removed.is_empty() {
            MutationRecord::text(node.clone())
        } else {
            MutationRecord::removed(node.clone(), removed)
        };
        self.emit(vec![record]);
    }

    fn data(&self, node: &Element, key: &str) -> Option<String> {
        node.data(key)
    }

    fn set_data(&self, node: &Element, key: &str, value: &str) {
        node.set_data(key, value);
    }
}

impl MutationSource for MemoryPage {
    fn observe(&self, sink: mpsc::UnboundedSender<MutationBatch<Element>>) -> ObserverId {
        let id = self.next_id();
        self.inner.observers.lock().insert(id, sink);
        debug!("Mutation observer {} registered", id);
        id
    }

    fn disconnect(&self, id: ObserverId) {
        if self.inner.observers.lock().remove(&id).is_some() {
            debug!("Mutation observer {} disconnected", id);
        }
    }
}

impl PointerSurface for MemoryPage {
    fn hostname(&self) -> String {
        self.inner.hostname.clone()
    }

    fn viewport(&self) -> ViewportInfo {
        *self.inner.viewport.read()
    }

    fn element_at(&self, x: f64, y: f64) -> Option<Element> {
        let mut hits = Vec::new();
        self.collect_hits(&self.inner.body, 0, x, y, &mut hits);
        // Highest z-index wins, then the deepest node, then the one painted last.
        hits.into_iter()
            .max_by(|a, b| {
                a.z_index
                    .cmp(&b.z_index)
                    .then(a.depth.cmp(&b.depth))
                    .then(a.order.cmp(&b.order))
            })
            .map(|hit| hit.element)
    }

    fn bounding_box(&self, node: &Element) -> BoundingBox {
        node.rect()
    }

    fn create_overlay(&self) -> Element {
        let overlay = Element::new("div")
            .with_class(OVERLAY_CLASS)
            .with_z_index(i32::MAX);
        self.append_child(&self.inner.body, overlay.clone());
        overlay
    }

    fn place_overlay(&self, overlay: &Element, rect: BoundingBox) {
        overlay.set_rect(rect.normalized());
    }

    fn set_hidden(&self, node: &Element, hidden: bool) {
        node.set_hidden(hidden);
    }

    fn remove_node(&self, node: &Element) {
        if let Some(parent) = node.parent() {
            self.remove_child(&parent, node);
        }
    }

    fn cursor(&self) -> String {
        self.inner.cursor.read().clone()
    }

    fn set_cursor(&self, cursor: &str) {
        *self.inner.cursor.write() = cursor.to_string();
    }

    fn listen_pointer(&self, sink: mpsc::UnboundedSender<PointerEvent>) -> ListenerId {
        let id = self.next_id();
        self.inner.listeners.lock().insert(id, sink);
        id
    }

    fn unlisten_pointer(&self, id: ListenerId) {
        self.inner.listeners.lock().remove(&id);
    }
}
