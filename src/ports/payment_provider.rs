//! Payment provider port.
//!
//! Defines the contract for the payment gateway (e.g., Stripe). This core
//! only ever verifies an existing payment by reference; checkout and
//! charging happen in the client flow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for payment verification.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Retrieves the payment recorded under `reference`.
    ///
    /// A declined or still-pending payment is a successful retrieval
    /// (see [`PaymentStatus`]); only transport faults and unknown
    /// references are errors.
    async fn retrieve_payment(
        &self,
        reference: &str,
    ) -> Result<PaymentVerification, PaymentError>;
}

/// Outcome of verifying a payment reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    /// The provider's payment reference.
    pub reference: String,

    /// Terminal or pending state of the payment.
    pub status: PaymentStatus,

    /// Amount in the provider's smallest currency unit.
    pub amount_cents: i64,
}

impl PaymentVerification {
    /// Whether the payment definitively succeeded.
    pub fn succeeded(&self) -> bool {
        self.status == PaymentStatus::Succeeded
    }
}

/// Payment state as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Funds captured.
    Succeeded,
    /// Definitively declined.
    Failed,
    /// Not yet settled; treated as not-succeeded by the granter.
    Pending,
}

/// Error codes for payment provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    /// Transient transport or provider outage; safe to retry.
    Unavailable,

    /// The reference does not name a payment the provider knows.
    InvalidReference,

    /// Provider rejected the request for a non-transient reason.
    ProviderError,
}

/// Payment provider failure.
#[derive(Debug, Clone)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Unavailable, message)
    }

    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::new(
            PaymentErrorCode::InvalidReference,
            format!("No such payment: {}", reference.into()),
        )
    }

    /// Returns true if retrying the retrieval may succeed.
    pub fn is_transient(&self) -> bool {
        self.code == PaymentErrorCode::Unavailable
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PaymentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_succeeded_status_counts_as_success() {
        let verification = |status| PaymentVerification {
            reference: "pi_1".to_string(),
            status,
            amount_cents: 499,
        };

        assert!(verification(PaymentStatus::Succeeded).succeeded());
        assert!(!verification(PaymentStatus::Failed).succeeded());
        assert!(!verification(PaymentStatus::Pending).succeeded());
    }

    #[test]
    fn only_unavailable_is_transient() {
        assert!(PaymentError::unavailable("timeout").is_transient());
        assert!(!PaymentError::invalid_reference("pi_x").is_transient());
        assert!(!PaymentError::new(PaymentErrorCode::ProviderError, "bad key").is_transient());
    }
}
