//! Origin tag stores.
//!
//! An origin tag is the text a label element showed the first time the
//! engine saw it. It is the dictionary lookup key for that element and is
//! never recomputed from the (possibly overridden) visible text.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use slactac_protocols::{LabelDom, WeakNode};

/// Per-node origin tag storage.
pub trait OriginTags<P: LabelDom>: Send + Sync {
    /// Tag previously assigned to `node`, if any.
    fn origin(&self, page: &P, node: &P::Node) -> Option<String>;

    /// Record `origin` for `node`. Called once per node.
    fn assign(&self, page: &P, node: &P::Node, origin: &str);

    /// Drop entries for nodes that no longer exist. Called at the start of
    /// every pass. Returns the number of entries dropped.
    fn prune(&self) -> usize {
        0
    }
}

/// Stores the tag on the node itself as node data.
#[derive(Debug, Clone)]
pub struct DatasetOriginTags {
    key: String,
}

impl DatasetOriginTags {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<P: LabelDom> OriginTags<P> for DatasetOriginTags {
    fn origin(&self, page: &P, node: &P::Node) -> Option<String> {
        page.data(node, &self.key)
    }

    fn assign(&self, page: &P, node: &P::Node, origin: &str) {
        page.set_data(node, &self.key, origin);
    }
}

/// Identity-keyed side table holding weak node references, for pages that
/// cannot attach data to nodes.
pub struct WeakOriginTable<N: WeakNode> {
    entries: Mutex<HashMap<usize, (N::Weak, String)>>,
}

impl<N: WeakNode> WeakOriginTable<N> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of entries, live or not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<N: WeakNode> Default for WeakOriginTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> OriginTags<P> for WeakOriginTable<P::Node>
where
    P: LabelDom,
    P::Node: WeakNode,
{
    fn origin(&self, _page: &P, node: &P::Node) -> Option<String> {
        let mut entries = self.entries.lock();
        let identity = node.identity();
        let (weak, origin) = entries.get(&identity)?;
        // Identities are reused once a node is dropped.
        if <P::Node as WeakNode>::upgrade(weak).as_ref() == Some(node) {
            return Some(origin.clone());
        }
        entries.remove(&identity);
        None
    }

    fn assign(&self, _page: &P, node: &P::Node, origin: &str) {
        self.entries
            .lock()
            .insert(node.identity(), (node.downgrade(), origin.to_string()));
    }

    fn prune(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, (weak, _)| <P::Node as WeakNode>::upgrade(weak).is_some());
        let pruned = before - entries.len();
        if pruned > 0 {
            debug!("Pruned {} origin tags of removed labels", pruned);
        }
        pruned
    }
}
