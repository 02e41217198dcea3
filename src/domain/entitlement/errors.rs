//! Entitlement-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthenticated | 401 |
//! | InvalidPlan | 400 |
//! | InvalidPaymentReference | 400 |
//! | PaymentProviderUnavailable | 503 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors surfaced by the entitlement granter.
///
/// A declined or pending payment is NOT an error: it is the normal
/// `granted: false` outcome. Only caller mistakes, provider faults, and
/// store faults land here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// No caller identity was supplied.
    Unauthenticated,

    /// Requested plan is not a purchasable plan.
    InvalidPlan(String),

    /// The payment reference is unknown to the provider.
    InvalidPaymentReference(String),

    /// Payment provider transient fault; safe to retry.
    PaymentProviderUnavailable { reason: String },

    /// Store fault.
    Infrastructure(String),
}

impl EntitlementError {
    pub fn invalid_plan(plan: impl Into<String>) -> Self {
        EntitlementError::InvalidPlan(plan.into())
    }

    pub fn invalid_payment_reference(reference: impl Into<String>) -> Self {
        EntitlementError::InvalidPaymentReference(reference.into())
    }

    pub fn provider_unavailable(reason: impl Into<String>) -> Self {
        EntitlementError::PaymentProviderUnavailable {
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::Unauthenticated => ErrorCode::Unauthenticated,
            EntitlementError::InvalidPlan(_) => ErrorCode::InvalidPlan,
            EntitlementError::InvalidPaymentReference(_) => ErrorCode::ValidationFailed,
            EntitlementError::PaymentProviderUnavailable { .. } => {
                ErrorCode::PaymentProviderUnavailable
            }
            EntitlementError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            EntitlementError::Unauthenticated => "Caller is not authenticated".to_string(),
            EntitlementError::InvalidPlan(plan) => format!("Invalid premium plan: {}", plan),
            EntitlementError::InvalidPaymentReference(reference) => {
                format!("Unknown payment reference: {}", reference)
            }
            EntitlementError::PaymentProviderUnavailable { reason } => {
                format!("Payment provider unavailable: {}", reason)
            }
            EntitlementError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EntitlementError::PaymentProviderUnavailable { .. }
                | EntitlementError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EntitlementError {}

impl From<DomainError> for EntitlementError {
    fn from(err: DomainError) -> Self {
        EntitlementError::Infrastructure(err.to_string())
    }
}

impl From<EntitlementError> for DomainError {
    fn from(err: EntitlementError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_maps_to_taxonomy_code() {
        assert_eq!(
            EntitlementError::Unauthenticated.code(),
            ErrorCode::Unauthenticated
        );
    }

    #[test]
    fn invalid_plan_message_includes_plan() {
        let err = EntitlementError::invalid_plan("weekly");
        assert!(err.message().contains("weekly"));
        assert_eq!(err.code(), ErrorCode::InvalidPlan);
    }

    #[test]
    fn provider_unavailable_is_retryable() {
        let err = EntitlementError::provider_unavailable("timeout");
        assert!(err.is_retryable());
        assert_eq!(err.code(), ErrorCode::PaymentProviderUnavailable);
    }

    #[test]
    fn invalid_plan_is_not_retryable() {
        assert!(!EntitlementError::invalid_plan("weekly").is_retryable());
        assert!(!EntitlementError::Unauthenticated.is_retryable());
    }

    #[test]
    fn store_errors_convert_to_infrastructure() {
        let domain_err = DomainError::store("connection lost");
        let err: EntitlementError = domain_err.into();
        assert!(matches!(err, EntitlementError::Infrastructure(_)));
    }

    #[test]
    fn display_matches_message() {
        let err = EntitlementError::invalid_payment_reference("pi_missing");
        assert_eq!(format!("{}", err), err.message());
    }
}
