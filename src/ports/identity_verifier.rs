//! Identity verifier port.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, CallerIdentity};

/// Port for resolving a bearer token into a caller identity.
///
/// The identity provider is trusted as given: whatever principal id and
/// admin capability the verified token carries is what the handlers see.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies a bearer token and extracts the caller identity.
    async fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError>;
}
