//! Entitlement store port - the User/PremiumGrant pair.
//!
//! The store owns the one shared-mutable-state hazard in the system: the
//! user's premium pair is written by both the granter and the sweeper.
//! Implementations MUST apply `apply_grant` and `revoke_grant` as atomic
//! conditional multi-record writes scoped to a single user (a transaction
//! in Postgres, a state lock in memory), so a concurrent grant and sweep
//! for the same user can never leave the flag and the grant record
//! disagreeing.

use async_trait::async_trait;

use crate::domain::entitlement::PremiumGrant;
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Port for the paired User + PremiumGrant state.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Atomically promote the user and upsert their grant.
    ///
    /// Overwrites any prior grant for the same user: at most one grant
    /// per user id exists afterwards. Re-granting while premium replaces
    /// the record rather than erroring.
    async fn apply_grant(&self, grant: &PremiumGrant) -> Result<(), DomainError>;

    /// Atomically demote the user and delete their grant.
    ///
    /// Idempotent: demotes the user even when no grant record exists
    /// (the residue of a crash between paired writes on a store without
    /// native transactions), and succeeds when the user is already free.
    async fn revoke_grant(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Looks up the active grant for a user.
    async fn find_grant(&self, user_id: &UserId) -> Result<Option<PremiumGrant>, DomainError>;

    /// Looks up a grant previously recorded under a payment reference.
    ///
    /// Backs the idempotency guard: replaying a payment reference must
    /// not extend entitlement a second time.
    async fn find_grant_by_payment(
        &self,
        payment_reference: &str,
    ) -> Result<Option<PremiumGrant>, DomainError>;

    /// All grants whose expiry lies strictly before `now`.
    async fn expired_grants(&self, now: Timestamp) -> Result<Vec<PremiumGrant>, DomainError>;

    /// Users flagged premium with no grant record behind the flag.
    ///
    /// Feeds the sweeper's reconciliation pass; on a store with atomic
    /// paired writes this is always empty.
    async fn unbacked_premium_users(&self) -> Result<Vec<UserId>, DomainError>;
}
