//! Entitlement handlers - grant on payment, revoke on expiry.

mod grant_entitlement;
mod sweep_expired_grants;

pub use grant_entitlement::{GrantEntitlementCommand, GrantEntitlementHandler, GrantOutcome};
pub use sweep_expired_grants::{
    SweepExpiredGrantsCommand, SweepExpiredGrantsHandler, SweepReport,
};
