//! PremiumGrant aggregate - the record of an active paid entitlement.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

use super::PremiumPlan;

/// Record of an active paid entitlement.
///
/// # Invariants
///
/// - At most one grant per user id; a re-grant replaces the existing
///   record rather than accumulating
/// - A grant existing for user U implies `UserRecord(U).is_premium`;
///   every writer applies the pair as one unit
/// - `expiry_date` is derived from `granted_at` with calendar-month
///   arithmetic, never fixed 30-day windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumGrant {
    /// User who owns this grant.
    pub user_id: UserId,

    /// Plan the grant was purchased under.
    pub plan: PremiumPlan,

    /// Amount paid, in the payment provider's smallest currency unit.
    pub amount_cents: i64,

    /// Payment provider reference that funded this grant.
    pub payment_reference: String,

    /// When the grant was issued.
    pub granted_at: Timestamp,

    /// When the entitlement lapses.
    pub expiry_date: Timestamp,
}

impl PremiumGrant {
    /// Issues a grant starting at `granted_at`.
    ///
    /// Expiry is `granted_at` plus one calendar month (monthly) or twelve
    /// (yearly), with end-of-month clamping.
    pub fn issue(
        user_id: UserId,
        plan: PremiumPlan,
        amount_cents: i64,
        payment_reference: impl Into<String>,
        granted_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            plan,
            amount_cents,
            payment_reference: payment_reference.into(),
            granted_at,
            expiry_date: granted_at.plus_calendar_months(plan.months()),
        }
    }

    /// Whether the entitlement has lapsed as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiry_date.is_before(&now)
    }
}
