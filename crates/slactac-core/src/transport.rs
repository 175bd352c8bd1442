//! In-process transport into an engine.

use std::sync::{Arc, Weak};

use async_trait::async_trait;

use slactac_protocols::{
    MessageResponse, MessageSender, MessageTransport, MessagingError, Page, RuntimeMessage,
};

use crate::engine::Engine;

/// Routes requests straight into an engine as the extension itself.
///
/// Holds the engine weakly: once it is dropped, requests fail with
/// [`MessagingError::NoReceiver`].
pub struct LocalTransport<P: Page> {
    engine: Weak<Engine<P>>,
}

impl<P: Page + 'static> LocalTransport<P> {
    pub fn new(engine: &Arc<Engine<P>>) -> Self {
        Self {
            engine: Arc::downgrade(engine),
        }
    }
}

#[async_trait]
impl<P: Page + 'static> MessageTransport for LocalTransport<P> {
    async fn request(&self, message: RuntimeMessage) -> Result<MessageResponse, MessagingError> {
        let engine = self.engine.upgrade().ok_or(MessagingError::NoReceiver)?;
        let raw = serde_json::to_value(&message)
            .map_err(|e| MessagingError::Malformed(e.to_string()))?;
        let sender = MessageSender::extension(engine.extension_id());
        Ok(engine.handle_message(raw, &sender).await)
    }
}
