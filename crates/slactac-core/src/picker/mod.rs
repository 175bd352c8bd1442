//! Channel picker.
//!
//! While active the picker intercepts pointer input over the whole page,
//! highlights the candidate element under the pointer and captures its
//! trimmed text on click. A click always ends the session.

mod overlay;

pub use overlay::cutout;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

use slactac_config::PickerConfig;
use slactac_protocols::{BoundingBox, ListenerId, PointerEvent, PointerSurface};

use crate::error::PickerError;

#[cfg(test)]
#[path = "picker_tests.rs"]
mod tests;

/// Result of [`Picker::activate`].
#[derive(Debug)]
pub enum Activation {
    /// A new session started. Pointer events for it arrive on the receiver.
    Started(mpsc::UnboundedReceiver<PointerEvent>),
    /// A session was already running; nothing changed.
    AlreadyActive,
}

/// Result of a click while active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(String),
    /// Nothing highlighted, or the highlighted element had no text.
    NoPick,
}

enum PickerState<N> {
    Inactive,
    Active(Session<N>),
}

struct Session<N> {
    highlighted: Option<N>,
    overlays: Vec<N>,
    saved_cursor: String,
    listener: ListenerId,
}

/// Click-to-capture picker over a page.
pub struct Picker<P: PointerSurface> {
    page: Arc<P>,
    config: PickerConfig,
    state: Mutex<PickerState<P::Node>>,
}

impl<P: PointerSurface> Picker<P> {
    pub fn new(page: Arc<P>, config: PickerConfig) -> Self {
        Self {
            page,
            config,
            state: Mutex::new(PickerState::Inactive),
        }
    }

    /// Start a session. Refused on pages that are not a target host.
    pub fn activate(&self) -> Result<Activation, PickerError> {
        let hostname = self.page.hostname();
        if !self.config.matches_host(&hostname) {
            return Err(PickerError::UnsupportedHost(hostname));
        }

        let mut state = self.state.lock();
        if matches!(*state, PickerState::Active(_)) {
            debug!("Picker already active");
            return Ok(Activation::AlreadyActive);
        }

        let overlays = (0..4).map(|_| self.page.create_overlay()).collect();
        let saved_cursor = self.page.cursor();
        self.page.set_cursor(&self.config.cursor);
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = self.page.listen_pointer(tx);

        *state = PickerState::Active(Session {
            highlighted: None,
            overlays,
            saved_cursor,
            listener,
        });
        info!("Picker activated on {}", hostname);
        Ok(Activation::Started(rx))
    }

    /// End the session, if any. Returns false when already inactive.
    pub fn deactivate(&self) -> bool {
        let session = match std::mem::replace(&mut *self.state.lock(), PickerState::Inactive) {
            PickerState::Active(session) => session,
            PickerState::Inactive => return false,
        };
        self.teardown(session);
        info!("Picker deactivated");
        true
    }

    pub fn is_active(&self) -> bool {
        matches!(*self.state.lock(), PickerState::Active(_))
    }

    /// Currently highlighted candidate.
    pub fn highlighted(&self) -> Option<P::Node> {
        match &*self.state.lock() {
            PickerState::Active(session) => session.highlighted.clone(),
            PickerState::Inactive => None,
        }
    }

    /// Track the pointer. Returns true when the highlighted candidate changed.
    pub fn pointer_moved(&self, x: f64, y: f64) -> bool {
        let mut state = self.state.lock();
        let PickerState::Active(session) = &mut *state else {
            return false;
        };

        // Hide our own overlays so the hit test sees the page underneath.
        for overlay in &session.overlays {
            self.page.set_hidden(overlay, true);
        }
        let hit = self.page.element_at(x, y);
        for overlay in &session.overlays {
            self.page.set_hidden(overlay, false);
        }

        let candidate = hit.filter(|node| !session.overlays.contains(node) && self.fits(node));
        let changed = candidate != session.highlighted;
        if changed {
            session.highlighted = candidate;
        }
        self.redraw(session);
        changed
    }

    /// Handle a click. `None` when no session was active.
    pub fn clicked(&self) -> Option<PickOutcome> {
        let session = match std::mem::replace(&mut *self.state.lock(), PickerState::Inactive) {
            PickerState::Active(session) => session,
            PickerState::Inactive => return None,
        };

        let text = session
            .highlighted
            .as_ref()
            .map(|node| self.page.text(node).trim().to_string())
            .unwrap_or_default();
        self.teardown(session);

        if text.is_empty() {
            info!("Picker closed without a pick");
            Some(PickOutcome::NoPick)
        } else {
            info!("Picked '{}'", text);
            Some(PickOutcome::Picked(text))
        }
    }

    fn fits(&self, node: &P::Node) -> bool {
        let rect = self.page.bounding_box(node);
        let viewport = self.page.viewport();
        let min = self.config.min_size_px;
        let fraction = self.config.max_viewport_fraction;

        rect.width >= min
            && rect.height >= min
            && rect.width <= viewport.width * fraction
            && rect.height <= viewport.height * fraction
    }

    fn redraw(&self, session: &Session<P::Node>) {
        match &session.highlighted {
            Some(node) => {
                let rects = cutout(self.page.bounding_box(node), self.page.viewport());
                for (overlay, rect) in session.overlays.iter().zip(rects) {
                    self.page.place_overlay(overlay, rect);
                }
            }
            None => {
                for overlay in &session.overlays {
                    self.page.place_overlay(overlay, BoundingBox::default());
                }
            }
        }
    }

    fn teardown(&self, session: Session<P::Node>) {
        self.page.unlisten_pointer(session.listener);
        for overlay in &session.overlays {
            self.page.remove_node(overlay);
        }
        self.page.set_cursor(&session.saved_cursor);
    }
}
