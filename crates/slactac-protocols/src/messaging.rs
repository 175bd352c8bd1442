//! Cross-context messaging protocol definitions.
//!
//! The configuration UI and the page-embedded engine live in separate
//! contexts and talk through asynchronous request/response messages keyed by
//! an `action` field.
//!
//! ## Actions
//!
//! | Action | Direction | Response |
//! |--------|-----------|----------|
//! | `refreshNamesSLACTAC` | UI → engine | status |
//! | `activateChannelPicker` | UI → engine | success + status |
//! | `deactivateChannelPicker` | UI → engine | success + status |
//! | `channelPicked` | engine → UI | none |
//! | `pickerDeactivated` | engine → UI | none |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MessagingError;

#[cfg(test)]
#[path = "messaging_tests.rs"]
mod tests;

/// Known message actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "refreshNamesSLACTAC")]
    RefreshNames,
    #[serde(rename = "activateChannelPicker")]
    ActivateChannelPicker,
    #[serde(rename = "deactivateChannelPicker")]
    DeactivateChannelPicker,
    #[serde(rename = "channelPicked")]
    ChannelPicked,
    #[serde(rename = "pickerDeactivated")]
    PickerDeactivated,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::RefreshNames,
        Action::ActivateChannelPicker,
        Action::DeactivateChannelPicker,
        Action::ChannelPicked,
        Action::PickerDeactivated,
    ];

    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RefreshNames => "refreshNamesSLACTAC",
            Self::ActivateChannelPicker => "activateChannelPicker",
            Self::DeactivateChannelPicker => "deactivateChannelPicker",
            Self::ChannelPicked => "channelPicked",
            Self::PickerDeactivated => "pickerDeactivated",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }
}

/// A request as it arrives over the wire.
///
/// `action` stays a raw string so unknown actions can still be answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Remaining fields of the message.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl RuntimeMessage {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action.as_str().to_string()),
            payload: Map::new(),
        }
    }

    /// Decode a raw JSON message.
    pub fn from_value(value: Value) -> Result<Self, MessagingError> {
        if !value.is_object() {
            return Err(MessagingError::Malformed(
                "message must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| MessagingError::Malformed(e.to_string()))
    }

    /// The recognized action, if any.
    pub fn known_action(&self) -> Option<Action> {
        self.action.as_deref().and_then(Action::parse)
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}

/// Identity of whoever sent a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    /// Extension identity of the sending context. `None` for page scripts
    /// and other untrusted origins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// URL of the sending context, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MessageSender {
    pub fn extension(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            url: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Response to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub status: String,
}

impl MessageResponse {
    /// Status-only response.
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            success: None,
            status: status.into(),
        }
    }

    pub fn ok(status: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            status: status.into(),
        }
    }

    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            status: status.into(),
        }
    }

    pub fn unknown_action(action: Option<&str>) -> Self {
        Self::failed(format!("Unknown action: {}", action.unwrap_or("<none>")))
    }

    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}

/// Notifications from the engine to the configuration UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum UiMessage {
    #[serde(rename = "channelPicked")]
    ChannelPicked {
        #[serde(rename = "channelName")]
        channel_name: String,
    },
    #[serde(rename = "pickerDeactivated")]
    PickerDeactivated,
}

impl UiMessage {
    pub fn action(&self) -> Action {
        match self {
            Self::ChannelPicked { .. } => Action::ChannelPicked,
            Self::PickerDeactivated => Action::PickerDeactivated,
        }
    }
}

/// Engine → UI notification channel.
#[async_trait]
pub trait UiNotifier: Send + Sync {
    /// Deliver a notification. Fails with [`MessagingError::NoReceiver`]
    /// when no UI is listening.
    async fn notify(&self, message: UiMessage) -> Result<(), MessagingError>;
}

/// UI → engine request channel.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn request(&self, message: RuntimeMessage) -> Result<MessageResponse, MessagingError>;
}
