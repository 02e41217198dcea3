//! Bearer-token middleware and caller extractor.
//!
//! The middleware resolves `Authorization: Bearer <token>` through the
//! `IdentityVerifier` port and injects the `CallerIdentity` into request
//! extensions. A missing token is NOT rejected here: the handlers own
//! the Unauthenticated/PermissionDenied decisions, so the extractor
//! hands them an `Option<CallerIdentity>`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, CallerIdentity};
use crate::ports::IdentityVerifier;

use super::dto::ErrorResponse;

/// Auth middleware state - wraps the identity verifier.
pub type AuthState = Arc<dyn IdentityVerifier>;

/// Validates a Bearer token when present.
///
/// - Valid token: injects `CallerIdentity` into request extensions
/// - Missing token: continues without injecting (handlers decide)
/// - Invalid token: 401 (or 503 when the identity service is down)
pub async fn auth_middleware(
    State(verifier): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    match token {
        Some(token) => match verifier.verify(&token).await {
            Ok(caller) => {
                request.extensions_mut().insert(caller);
                next.run(request).await
            }
            Err(err) => {
                let (status, message) = match &err {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("Identity service unavailable: {}", msg);
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Identity service unavailable",
                        )
                    }
                };
                (status, Json(ErrorResponse::new("AUTH_ERROR", message))).into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor handing the handler whatever identity the middleware
/// resolved, if any.
#[derive(Debug, Clone)]
pub struct OptionalCaller(pub Option<CallerIdentity>);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for OptionalCaller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalCaller(
            parts.extensions.get::<CallerIdentity>().cloned(),
        ))
    }
}
