//! Engine instance.
//!
//! One engine per page context owns the reconciler, the change detector,
//! the picker and the pointer task driving it, and answers runtime messages
//! from the configuration UI.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use slactac_config::{Config, ConfigError};
use slactac_protocols::{
    Action, MessageResponse, MessageSender, Page, PointerEvent, Storage, UiMessage, UiNotifier,
};

use crate::detector::ChangeDetector;
use crate::error::PickerError;
use crate::origin::{DatasetOriginTags, OriginTags};
use crate::picker::{Activation, PickOutcome, Picker};
use crate::reconciler::{OverrideReconciler, PassReport};
use crate::router::MessageGuard;
use crate::sanitize::Sanitizer;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EngineState {
    /// Constructed, not watching the page.
    Created = 0,
    /// Watching the page.
    Running = 1,
    /// Stopped; may be started again.
    Stopped = 2,
}

impl From<u8> for EngineState {
    fn from(v: u8) -> Self {
        match v {
            1 => EngineState::Running,
            2 => EngineState::Stopped,
            _ => EngineState::Created,
        }
    }
}

/// Page-embedded label-override engine.
pub struct Engine<P: Page> {
    page: Arc<P>,
    config: Config,
    storage: Storage,
    notifier: Arc<dyn UiNotifier>,
    guard: MessageGuard,
    reconciler: Arc<OverrideReconciler<P>>,
    detector: ChangeDetector<P>,
    picker: Arc<Picker<P>>,
    pointer_task: Mutex<Option<JoinHandle<()>>>,
    state: AtomicU8,
}

impl<P: Page + 'static> Engine<P> {
    /// Engine storing origin tags as node data.
    pub fn new(
        page: Arc<P>,
        storage: Storage,
        notifier: Arc<dyn UiNotifier>,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let origins = Arc::new(DatasetOriginTags::new(config.selectors.origin_key.clone()));
        Self::with_origin_tags(page, storage, notifier, config, origins)
    }

    pub fn with_origin_tags(
        page: Arc<P>,
        storage: Storage,
        notifier: Arc<dyn UiNotifier>,
        config: Config,
        origins: Arc<dyn OriginTags<P>>,
    ) -> Result<Self, ConfigError> {
        let sanitizer = Sanitizer::from_config(&config.security)?;
        let reconciler = Arc::new(OverrideReconciler::new(
            page.clone(),
            storage.clone(),
            sanitizer,
            origins,
            &config,
        ));
        let detector = ChangeDetector::new(
            page.clone(),
            reconciler.clone(),
            config.selectors.label_class.clone(),
            config.detector.debounce(),
        );
        let picker = Arc::new(Picker::new(page.clone(), config.picker.clone()));

        Ok(Self {
            guard: MessageGuard::new(config.security.extension_id.clone()),
            page,
            config,
            storage,
            notifier,
            reconciler,
            detector,
            picker,
            pointer_task: Mutex::new(None),
            state: AtomicU8::new(EngineState::Created as u8),
        })
    }

    /// Subscribe to page mutations. The initial pass runs immediately.
    pub fn start(&self) {
        if self.detector.start() {
            self.state.store(EngineState::Running as u8, Ordering::SeqCst);
            info!("Engine started on {}", self.page.hostname());
        }
    }

    /// End any picker session and unsubscribe.
    pub async fn stop(&self) {
        self.deactivate_picker().await;
        if let Some(handle) = self.pointer_task.lock().take() {
            handle.abort();
        }
        if self.detector.stop().await {
            self.state.store(EngineState::Stopped as u8, Ordering::SeqCst);
            info!("Engine stopped");
        }
    }

    pub fn state(&self) -> EngineState {
        EngineState::from(self.state.load(Ordering::SeqCst))
    }

    /// Reconcile now, bypassing the debounce window.
    pub async fn refresh_now(&self) -> Option<PassReport> {
        self.reconciler.run().await
    }

    /// Start a picker session and the task feeding it pointer events.
    /// Returns false when a session was already running.
    pub fn activate_picker(&self) -> Result<bool, PickerError> {
        let events = match self.picker.activate()? {
            Activation::Started(events) => events,
            Activation::AlreadyActive => return Ok(false),
        };

        let handle = tokio::spawn(drive_picker(
            self.picker.clone(),
            self.storage.clone(),
            self.notifier.clone(),
            self.config.storage.last_picked_key.clone(),
            events,
        ));
        // A previous task lost its listener with its session and is finishing.
        *self.pointer_task.lock() = Some(handle);
        Ok(true)
    }

    /// End the picker session. Returns false when none was running.
    pub async fn deactivate_picker(&self) -> bool {
        if !self.picker.deactivate() {
            return false;
        }
        notify(self.notifier.as_ref(), UiMessage::PickerDeactivated).await;
        true
    }

    /// Answer one runtime message. Never fails: every message gets a
    /// response, rejected ones included.
    pub async fn handle_message(&self, raw: Value, sender: &MessageSender) -> MessageResponse {
        let message = match self.guard.admit(raw, sender) {
            Ok(message) => message,
            Err(e) => {
                warn!("Rejected message: {}", e);
                return MessageResponse::failed(e.to_string());
            }
        };

        match message.known_action() {
            Some(Action::RefreshNames) => match self.refresh_now().await {
                Some(report) => {
                    debug!("Refresh applied {} writes", report.writes());
                    MessageResponse::status("Names refreshed")
                }
                None => MessageResponse::status("Refresh skipped: overrides unavailable"),
            },
            Some(Action::ActivateChannelPicker) => match self.activate_picker() {
                Ok(true) => MessageResponse::ok("Picker activated"),
                Ok(false) => MessageResponse::ok("Picker already active"),
                Err(e) => {
                    info!("Picker activation refused: {}", e);
                    MessageResponse::failed(e.to_string())
                }
            },
            Some(Action::DeactivateChannelPicker) => {
                if self.deactivate_picker().await {
                    MessageResponse::ok("Picker deactivated")
                } else {
                    MessageResponse::ok("Picker was not active")
                }
            }
            // Engine to UI only.
            Some(Action::ChannelPicked) | Some(Action::PickerDeactivated) | None => {
                debug!("Unknown action: {:?}", message.action);
                MessageResponse::unknown_action(message.action.as_deref())
            }
        }
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reconciler(&self) -> &Arc<OverrideReconciler<P>> {
        &self.reconciler
    }

    pub fn picker(&self) -> &Arc<Picker<P>> {
        &self.picker
    }

    pub fn extension_id(&self) -> &str {
        self.guard.extension_id()
    }
}

/// Feed pointer events to the picker until the session ends.
async fn drive_picker<P: Page + 'static>(
    picker: Arc<Picker<P>>,
    storage: Storage,
    notifier: Arc<dyn UiNotifier>,
    last_picked_key: String,
    mut events: mpsc::UnboundedReceiver<PointerEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            PointerEvent::Move { x, y } => {
                picker.pointer_moved(x, y);
            }
            PointerEvent::Click { .. } => {
                let Some(outcome) = picker.clicked() else {
                    break;
                };
                if let PickOutcome::Picked(name) = outcome {
                    if let Err(e) = storage
                        .local()
                        .set(&last_picked_key, Value::String(name.clone()))
                        .await
                    {
                        error!("Failed to store picked channel: {}", e);
                    }
                    notify(
                        notifier.as_ref(),
                        UiMessage::ChannelPicked { channel_name: name },
                    )
                    .await;
                }
                notify(notifier.as_ref(), UiMessage::PickerDeactivated).await;
                break;
            }
        }
    }
    debug!("Pointer task finished");
}

async fn notify(notifier: &dyn UiNotifier, message: UiMessage) {
    let action = message.action();
    if let Err(e) = notifier.notify(message).await {
        warn!("Could not deliver {}: {}", action.as_str(), e);
    }
}
