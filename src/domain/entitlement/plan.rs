//! Premium plan value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Paid subscription plan.
///
/// A user without a plan is on the free tier; that absence is modeled as
/// `Option<PremiumPlan>` on the user record rather than a variant here,
/// so a grant can never be issued for "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PremiumPlan {
    Monthly,
    Yearly,
}

impl PremiumPlan {
    /// Number of calendar months of entitlement this plan buys.
    pub fn months(&self) -> u32 {
        match self {
            PremiumPlan::Monthly => 1,
            PremiumPlan::Yearly => 12,
        }
    }

    /// Returns the wire name of the plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            PremiumPlan::Monthly => "monthly",
            PremiumPlan::Yearly => "yearly",
        }
    }
}

impl fmt::Display for PremiumPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PremiumPlan {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(PremiumPlan::Monthly),
            "yearly" => Ok(PremiumPlan::Yearly),
            other => Err(ValidationError::invalid_value(
                "plan",
                format!("'{}' is not 'monthly' or 'yearly'", other),
            )),
        }
    }
}
