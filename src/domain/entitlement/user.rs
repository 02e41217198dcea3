//! User record - the premium-facing slice of a CloudLocker user.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

use super::PremiumPlan;

/// A CloudLocker user as seen by the entitlement core.
///
/// Created externally at sign-up and never deleted here. This core only
/// flips the premium pair (`is_premium` + `premium_plan`); the push token
/// and admin capability are maintained by other parts of the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Principal id from the identity provider.
    pub id: UserId,

    /// Whether the user currently holds a premium entitlement.
    pub is_premium: bool,

    /// Plan behind the entitlement; `None` means free tier.
    pub premium_plan: Option<PremiumPlan>,

    /// Push delivery token, if the user's device registered one.
    pub push_token: Option<String>,

    /// Admin capability flag (set externally by the admin-claim flow).
    pub admin: bool,
}

impl UserRecord {
    /// Creates a free-tier user with no push token.
    pub fn free(id: UserId) -> Self {
        Self {
            id,
            is_premium: false,
            premium_plan: None,
            push_token: None,
            admin: false,
        }
    }

    /// Sets the push delivery token.
    pub fn with_push_token(mut self, token: impl Into<String>) -> Self {
        self.push_token = Some(token.into());
        self
    }

    /// Marks the user premium under the given plan.
    pub fn promote(&mut self, plan: PremiumPlan) {
        self.is_premium = true;
        self.premium_plan = Some(plan);
    }

    /// Returns the user to the free tier.
    pub fn demote(&mut self) {
        self.is_premium = false;
        self.premium_plan = None;
    }
}
