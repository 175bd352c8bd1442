//! Cross-context messaging errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Could not establish connection. Receiving end does not exist")]
    NoReceiver,

    #[error("Unauthorized sender: {0}")]
    Unauthorized(String),

    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_receiver_error() {
        let err = MessagingError::NoReceiver;
        assert!(err.to_string().contains("Receiving end does not exist"));
    }

    #[test]
    fn test_unauthorized_error() {
        let err = MessagingError::Unauthorized("evil-extension".to_string());
        let display = err.to_string();
        assert!(display.contains("Unauthorized"));
        assert!(display.contains("evil-extension"));
    }

    #[test]
    fn test_malformed_error() {
        let err = MessagingError::Malformed("missing action".to_string());
        assert!(err.to_string().contains("missing action"));
    }

    #[test]
    fn test_error_debug() {
        let err = MessagingError::NoReceiver;
        assert!(format!("{:?}", err).contains("NoReceiver"));
    }
}
