//! Message admission.
//!
//! Only the extension's own contexts may drive the engine. Anything else,
//! and anything that is not a JSON object, is rejected before an action is
//! looked at.

use serde_json::Value;

use slactac_protocols::{MessageSender, MessagingError, RuntimeMessage};

/// Sender check and decoding for incoming requests.
#[derive(Debug, Clone)]
pub struct MessageGuard {
    extension_id: String,
}

impl MessageGuard {
    pub fn new(extension_id: impl Into<String>) -> Self {
        Self {
            extension_id: extension_id.into(),
        }
    }

    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    /// Decode `raw` if `sender` is trusted.
    pub fn admit(&self, raw: Value, sender: &MessageSender) -> Result<RuntimeMessage, MessagingError> {
        match sender.id.as_deref() {
            Some(id) if id == self.extension_id => {}
            Some(id) => return Err(MessagingError::Unauthorized(id.to_string())),
            None => {
                return Err(MessagingError::Unauthorized(
                    sender.url.clone().unwrap_or_else(|| "<anonymous>".to_string()),
                ));
            }
        }
        RuntimeMessage::from_value(raw)
    }
}
