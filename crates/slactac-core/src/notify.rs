//! In-process UI notification channel.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use slactac_protocols::{MessagingError, UiMessage, UiNotifier};

/// Delivers notifications to an in-process receiver. Fails with
/// [`MessagingError::NoReceiver`] once the receiver is dropped, like a
/// closed popup.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<UiMessage>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl UiNotifier for ChannelNotifier {
    async fn notify(&self, message: UiMessage) -> Result<(), MessagingError> {
        debug!("Notifying UI: {}", message.action().as_str());
        self.tx.send(message).map_err(|_| MessagingError::NoReceiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier
            .notify(UiMessage::ChannelPicked {
                channel_name: "general".to_string(),
            })
            .await
            .unwrap();
        notifier.notify(UiMessage::PickerDeactivated).await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(UiMessage::ChannelPicked {
                channel_name: "general".to_string()
            })
        );
        assert_eq!(rx.recv().await, Some(UiMessage::PickerDeactivated));
    }

    #[tokio::test]
    async fn test_no_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        let err = notifier.notify(UiMessage::PickerDeactivated).await.unwrap_err();
        assert!(matches!(err, MessagingError::NoReceiver));
    }
}
