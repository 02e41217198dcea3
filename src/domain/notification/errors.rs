//! Notification-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthenticated | 401 |
//! | PermissionDenied | 403 |
//! | InvalidSegment | 400 |
//! | InvalidMessage | 400 |
//! | DispatchFailed | 503 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{AccessError, DomainError, ErrorCode, ValidationError};

/// Errors surfaced by the notification broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// No caller identity was supplied.
    Unauthenticated,

    /// Caller lacks the admin capability.
    PermissionDenied,

    /// Requested segment is not a known target segment.
    InvalidSegment(String),

    /// Title or body failed validation.
    InvalidMessage { field: String, reason: String },

    /// Every dispatch chunk failed at the transport level; safe to retry.
    DispatchFailed { reason: String },

    /// Store fault while selecting the segment.
    Infrastructure(String),
}

impl NotificationError {
    pub fn invalid_segment(segment: impl Into<String>) -> Self {
        NotificationError::InvalidSegment(segment.into())
    }

    pub fn dispatch_failed(reason: impl Into<String>) -> Self {
        NotificationError::DispatchFailed {
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        NotificationError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            NotificationError::Unauthenticated => ErrorCode::Unauthenticated,
            NotificationError::PermissionDenied => ErrorCode::PermissionDenied,
            NotificationError::InvalidSegment(_) => ErrorCode::InvalidSegment,
            NotificationError::InvalidMessage { .. } => ErrorCode::ValidationFailed,
            NotificationError::DispatchFailed { .. } => ErrorCode::PushProviderUnavailable,
            NotificationError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            NotificationError::Unauthenticated => "Caller is not authenticated".to_string(),
            NotificationError::PermissionDenied => {
                "Caller lacks the admin capability".to_string()
            }
            NotificationError::InvalidSegment(segment) => {
                format!("Invalid target segment: {}", segment)
            }
            NotificationError::InvalidMessage { field, reason } => {
                format!("Invalid message {}: {}", field, reason)
            }
            NotificationError::DispatchFailed { reason } => {
                format!("Push dispatch failed: {}", reason)
            }
            NotificationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NotificationError::DispatchFailed { .. } | NotificationError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for NotificationError {}

impl From<AccessError> for NotificationError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => NotificationError::Unauthenticated,
            AccessError::PermissionDenied { .. } => NotificationError::PermissionDenied,
        }
    }
}

impl From<ValidationError> for NotificationError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyField { field } => NotificationError::InvalidMessage {
                field,
                reason: "cannot be empty".to_string(),
            },
            ValidationError::InvalidValue { field, reason } => {
                NotificationError::InvalidMessage { field, reason }
            }
        }
    }
}

impl From<DomainError> for NotificationError {
    fn from(err: DomainError) -> Self {
        NotificationError::Infrastructure(err.to_string())
    }
}

impl From<NotificationError> for DomainError {
    fn from(err: NotificationError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
