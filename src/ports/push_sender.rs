//! Push sender port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::notification::PushMessage;

/// Port for the push notification service (e.g., FCM).
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Sends one batched request carrying `tokens`.
    ///
    /// The delivery report is informational: per-token delivery failures
    /// inside an accepted batch are the provider's concern, not this
    /// core's. Only a transport-level failure of the whole request is an
    /// error.
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<DeliveryReport, PushError>;
}

/// Provider-side result of a batched send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Tokens the provider accepted for delivery.
    pub submitted: usize,

    /// Tokens the provider rejected within the accepted batch.
    pub failed: usize,
}

/// Error codes for push provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushErrorCode {
    /// Transient transport or provider outage; safe to retry.
    Unavailable,

    /// Provider rejected the whole request (auth, payload shape).
    Rejected,
}

/// Push provider failure.
#[derive(Debug, Clone)]
pub struct PushError {
    pub code: PushErrorCode,
    pub message: String,
}

impl PushError {
    pub fn new(code: PushErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(PushErrorCode::Unavailable, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(PushErrorCode::Rejected, message)
    }

    /// Returns true if retrying the send may succeed.
    pub fn is_transient(&self) -> bool {
        self.code == PushErrorCode::Unavailable
    }
}

impl std::fmt::Display for PushError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PushError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_transient() {
        assert!(PushError::unavailable("timeout").is_transient());
        assert!(!PushError::rejected("bad server key").is_transient());
    }
}
