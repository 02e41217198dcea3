//! Axum router configuration.

use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use crate::ports::IdentityVerifier;

use super::handlers::{
    broadcast_notification, grant_entitlement, run_premium_expiry_sweep,
    run_storage_retention_sweep, AppState,
};
use super::middleware::auth_middleware;

/// Create the API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `POST /entitlements/grant` - Verify a payment and grant premium
///
/// ## Admin Endpoints (require admin capability)
/// - `POST /notifications/broadcast` - Push a message to a user segment
/// - `POST /maintenance/premium-expiry` - Scheduler trigger: expiry sweep
/// - `POST /maintenance/storage-retention` - Scheduler trigger: storage sweep
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/entitlements/grant", post(grant_entitlement))
        .route("/notifications/broadcast", post(broadcast_notification))
        .route("/maintenance/premium-expiry", post(run_premium_expiry_sweep))
        .route(
            "/maintenance/storage-retention",
            post(run_storage_retention_sweep),
        )
}

/// Create the complete application router with auth middleware applied.
pub fn router(state: AppState, verifier: Arc<dyn IdentityVerifier>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(middleware::from_fn_with_state(verifier, auth_middleware))
        .with_state(state)
}
