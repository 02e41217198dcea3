//! HTTP handlers connecting axum routes to the command handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::entitlement::{
    GrantEntitlementCommand, GrantEntitlementHandler, SweepExpiredGrantsCommand,
    SweepExpiredGrantsHandler,
};
use crate::application::handlers::notification::{
    BroadcastNotificationCommand, BroadcastNotificationHandler,
};
use crate::application::handlers::storage::{ReapStaleFilesCommand, ReapStaleFilesHandler};
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{require_admin, AccessError, DomainError};
use crate::domain::notification::NotificationError;
use crate::domain::storage::RetentionWindow;
use crate::ports::{
    BlobStore, Clock, EntitlementStore, FileRecordStore, PaymentProvider, PushSender,
    UserDirectory,
};

use super::dto::{
    BroadcastRequest, BroadcastResponse, ErrorResponse, GrantRequest, GrantResponse,
    ReapResponse, SweepResponse,
};
use super::middleware::OptionalCaller;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub entitlements: Arc<dyn EntitlementStore>,
    pub users: Arc<dyn UserDirectory>,
    pub files: Arc<dyn FileRecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub payments: Arc<dyn PaymentProvider>,
    pub push: Arc<dyn PushSender>,
    pub clock: Arc<dyn Clock>,
    pub retention: RetentionWindow,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn grant_handler(&self) -> GrantEntitlementHandler {
        GrantEntitlementHandler::new(
            self.entitlements.clone(),
            self.payments.clone(),
            self.clock.clone(),
        )
    }

    pub fn sweep_handler(&self) -> SweepExpiredGrantsHandler {
        SweepExpiredGrantsHandler::new(self.entitlements.clone())
    }

    pub fn reap_handler(&self) -> ReapStaleFilesHandler {
        ReapStaleFilesHandler::new(self.files.clone(), self.blobs.clone())
    }

    pub fn broadcast_handler(&self) -> BroadcastNotificationHandler {
        BroadcastNotificationHandler::new(self.users.clone(), self.push.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /entitlements/grant
pub async fn grant_entitlement(
    State(state): State<AppState>,
    OptionalCaller(caller): OptionalCaller,
    Json(request): Json<GrantRequest>,
) -> Response {
    let cmd = GrantEntitlementCommand {
        caller,
        payment_reference: request.payment_reference,
        plan: request.plan,
    };

    match state.grant_handler().handle(cmd).await {
        Ok(outcome) => Json(GrantResponse {
            granted: outcome.granted,
        })
        .into_response(),
        Err(err) => entitlement_error_response(err),
    }
}

/// POST /notifications/broadcast
pub async fn broadcast_notification(
    State(state): State<AppState>,
    OptionalCaller(caller): OptionalCaller,
    Json(request): Json<BroadcastRequest>,
) -> Response {
    let cmd = BroadcastNotificationCommand {
        caller,
        segment: request.segment,
        title: request.title,
        body: request.body,
    };

    match state.broadcast_handler().handle(cmd).await {
        Ok(receipt) => Json(BroadcastResponse {
            sent_to: receipt.sent_to,
        })
        .into_response(),
        Err(err) => notification_error_response(err),
    }
}

/// POST /maintenance/premium-expiry
///
/// Trigger endpoint for the external scheduler; admin-gated.
pub async fn run_premium_expiry_sweep(
    State(state): State<AppState>,
    OptionalCaller(caller): OptionalCaller,
) -> Response {
    if let Err(err) = require_admin(caller.as_ref()) {
        return access_error_response(err);
    }

    let cmd = SweepExpiredGrantsCommand {
        now: state.clock.now(),
    };
    match state.sweep_handler().handle(cmd).await {
        Ok(report) => Json(SweepResponse {
            processed: report.processed,
            failed: report.failed,
            reconciled: report.reconciled,
        })
        .into_response(),
        Err(err) => domain_error_response(err),
    }
}

/// POST /maintenance/storage-retention
///
/// Trigger endpoint for the external scheduler; admin-gated.
pub async fn run_storage_retention_sweep(
    State(state): State<AppState>,
    OptionalCaller(caller): OptionalCaller,
) -> Response {
    if let Err(err) = require_admin(caller.as_ref()) {
        return access_error_response(err);
    }

    let cmd = ReapStaleFilesCommand {
        now: state.clock.now(),
        retention: state.retention,
    };
    match state.reap_handler().handle(cmd).await {
        Ok(report) => Json(ReapResponse {
            deleted: report.deleted,
            blob_failures: report.blob_failures,
            record_failures: report.record_failures,
        })
        .into_response(),
        Err(err) => domain_error_response(err),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

fn entitlement_error_response(err: EntitlementError) -> Response {
    let status = match &err {
        EntitlementError::Unauthenticated => StatusCode::UNAUTHORIZED,
        EntitlementError::InvalidPlan(_) | EntitlementError::InvalidPaymentReference(_) => {
            StatusCode::BAD_REQUEST
        }
        EntitlementError::PaymentProviderUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        EntitlementError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.code().to_string(), err.message())
}

fn notification_error_response(err: NotificationError) -> Response {
    let status = match &err {
        NotificationError::Unauthenticated => StatusCode::UNAUTHORIZED,
        NotificationError::PermissionDenied => StatusCode::FORBIDDEN,
        NotificationError::InvalidSegment(_) | NotificationError::InvalidMessage { .. } => {
            StatusCode::BAD_REQUEST
        }
        NotificationError::DispatchFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
        NotificationError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.code().to_string(), err.message())
}

fn access_error_response(err: AccessError) -> Response {
    let status = match &err {
        AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
        AccessError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
    };
    error_response(status, err.code().to_string(), err.to_string())
}

fn domain_error_response(err: DomainError) -> Response {
    tracing::error!(error = %err, "maintenance run failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        err.code.to_string(),
        err.message,
    )
}

fn error_response(status: StatusCode, code: String, message: String) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}
