//! GrantEntitlementHandler - Command handler for payment-confirmed premium grants.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, PremiumGrant, PremiumPlan};
use crate::domain::foundation::{require_caller, CallerIdentity};
use crate::ports::{Clock, EntitlementStore, PaymentErrorCode, PaymentProvider};

/// Command to grant premium after a completed payment.
#[derive(Debug, Clone)]
pub struct GrantEntitlementCommand {
    /// Caller the grant is issued to; `None` when unauthenticated.
    pub caller: Option<CallerIdentity>,
    /// Payment provider reference to verify.
    pub payment_reference: String,
    /// Requested plan, as sent by the client ("monthly" / "yearly").
    pub plan: String,
}

/// Result of a grant attempt.
///
/// `granted: false` is the normal declined-payment outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantOutcome {
    pub granted: bool,
}

/// Handler for granting premium entitlements.
///
/// Verifies the payment with the provider and, on success, applies the
/// paired write (user premium flag + grant record) as one atomic unit
/// through the store port. Re-entrant: paying again while premium
/// replaces the existing grant. Replaying an already-applied payment
/// reference is a no-op that reports `granted: true`.
pub struct GrantEntitlementHandler {
    store: Arc<dyn EntitlementStore>,
    payments: Arc<dyn PaymentProvider>,
    clock: Arc<dyn Clock>,
}

impl GrantEntitlementHandler {
    pub fn new(
        store: Arc<dyn EntitlementStore>,
        payments: Arc<dyn PaymentProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            payments,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: GrantEntitlementCommand,
    ) -> Result<GrantOutcome, EntitlementError> {
        // 1. Admission: an identity must be present
        let caller = require_caller(cmd.caller.as_ref())
            .map_err(|_| EntitlementError::Unauthenticated)?;

        // 2. Validate the requested plan
        let plan: PremiumPlan = cmd
            .plan
            .parse()
            .map_err(|_| EntitlementError::invalid_plan(&cmd.plan))?;

        // 3. Idempotency guard: a replayed payment reference never
        //    extends entitlement a second time
        if let Some(existing) = self
            .store
            .find_grant_by_payment(&cmd.payment_reference)
            .await?
        {
            tracing::info!(
                user_id = %existing.user_id,
                payment_reference = %cmd.payment_reference,
                "payment reference already applied, skipping re-grant"
            );
            return Ok(GrantOutcome { granted: true });
        }

        // 4. Verify the payment with the provider
        let verification = match self.payments.retrieve_payment(&cmd.payment_reference).await {
            Ok(verification) => verification,
            Err(err) if err.code == PaymentErrorCode::InvalidReference => {
                return Err(EntitlementError::invalid_payment_reference(
                    &cmd.payment_reference,
                ));
            }
            Err(err) if err.is_transient() => {
                return Err(EntitlementError::provider_unavailable(err.message));
            }
            Err(err) => {
                return Err(EntitlementError::infrastructure(format!(
                    "payment provider rejected verification: {}",
                    err.message
                )));
            }
        };

        // 5. Declined or pending payment: normal non-granting outcome
        if !verification.succeeded() {
            tracing::info!(
                user_id = %caller.user_id,
                payment_reference = %cmd.payment_reference,
                status = ?verification.status,
                "payment not succeeded, no entitlement granted"
            );
            return Ok(GrantOutcome { granted: false });
        }

        // 6. Apply the paired write atomically: promote user + upsert grant
        let grant = PremiumGrant::issue(
            caller.user_id.clone(),
            plan,
            verification.amount_cents,
            &cmd.payment_reference,
            self.clock.now(),
        );
        self.store.apply_grant(&grant).await?;

        tracing::info!(
            user_id = %grant.user_id,
            plan = %grant.plan,
            expiry_date = %grant.expiry_date,
            "premium entitlement granted"
        );

        Ok(GrantOutcome { granted: true })
    }
}
