//! JWT implementation of the IdentityVerifier port.
//!
//! The identity provider issues HS256 tokens carrying the principal id
//! in `sub` and the admin capability as a boolean `admin` claim. This
//! core trusts the verified claims as given.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, CallerIdentity, UserId};
use crate::ports::IdentityVerifier;

/// Claims this core reads from an identity token.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    admin: bool,
    #[allow(dead_code)]
    exp: usize,
}

/// JWT implementation of the IdentityVerifier port.
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    /// Creates a verifier for HS256 tokens signed with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            },
        )?;

        let user_id = UserId::new(data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(CallerIdentity {
            user_id,
            admin: data.claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &[u8] = b"test-secret";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        admin: bool,
        exp: usize,
    }

    fn token(sub: &str, admin: bool, exp: usize) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                sub: sub.to_string(),
                admin,
                exp,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        4_102_444_800 // 2100-01-01
    }

    #[tokio::test]
    async fn valid_token_yields_caller_identity() {
        let verifier = JwtIdentityVerifier::new(SECRET);
        let caller = verifier
            .verify(&token("user-123", false, far_future()))
            .await
            .unwrap();

        assert_eq!(caller.user_id.as_str(), "user-123");
        assert!(!caller.admin);
    }

    #[tokio::test]
    async fn admin_claim_carries_through() {
        let verifier = JwtIdentityVerifier::new(SECRET);
        let caller = verifier
            .verify(&token("admin-1", true, far_future()))
            .await
            .unwrap();

        assert!(caller.admin);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let verifier = JwtIdentityVerifier::new(SECRET);
        let result = verifier.verify(&token("user-123", false, 1_000_000)).await;

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn token_signed_with_wrong_secret_is_rejected() {
        let verifier = JwtIdentityVerifier::new(b"other-secret");
        let result = verifier.verify(&token("user-123", false, far_future())).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let verifier = JwtIdentityVerifier::new(SECRET);
        let result = verifier.verify("not-a-jwt").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
