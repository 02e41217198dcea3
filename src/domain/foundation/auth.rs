//! Caller identity types for the domain layer.
//!
//! These types represent an authenticated principal extracted from a
//! validated bearer token. They have no provider dependencies - any
//! identity provider can populate them via the `IdentityVerifier` port.

use super::UserId;
use thiserror::Error;

/// Authenticated principal invoking an operation.
///
/// This is a **domain type** with no provider dependencies. The identity
/// provider is trusted as given: the admin capability is whatever the
/// verified token claims.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// The unique principal id from the identity provider.
    pub user_id: UserId,

    /// Whether the principal carries the admin capability.
    pub admin: bool,
}

impl CallerIdentity {
    /// Creates a caller identity without the admin capability.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            admin: false,
        }
    }

    /// Creates a caller identity carrying the admin capability.
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            admin: true,
        }
    }
}

/// Errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The identity service is unavailable (network, config, etc.).
    #[error("Identity service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
