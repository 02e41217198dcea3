//! Admission checks shared by the synchronous operations.
//!
//! Both caller-facing handlers admit requests the same way: the caller
//! must be present, and admin-gated operations additionally require the
//! admin capability. These helpers keep the checks and their logging
//! consistent across handlers.

use thiserror::Error;

use super::{CallerIdentity, ErrorCode};

/// Admission failures for caller-facing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No caller identity was supplied.
    #[error("Caller is not authenticated")]
    Unauthenticated,

    /// Caller lacks the required capability.
    #[error("Caller lacks the '{capability}' capability")]
    PermissionDenied { capability: &'static str },
}

impl AccessError {
    /// Returns the error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::Unauthenticated => ErrorCode::Unauthenticated,
            AccessError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
        }
    }
}

/// Admits any authenticated caller.
pub fn require_caller(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity, AccessError> {
    caller.ok_or(AccessError::Unauthenticated)
}

/// Admits only callers carrying the admin capability.
pub fn require_admin(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity, AccessError> {
    let caller = require_caller(caller)?;
    if !caller.admin {
        return Err(AccessError::PermissionDenied {
            capability: "admin",
        });
    }
    Ok(caller)
}
