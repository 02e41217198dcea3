//! In-memory document store for testing.
//!
//! Implements the entitlement, user directory, and file record ports over
//! a single state mutex. Holding all collections behind one lock gives
//! the paired User + PremiumGrant write the same atomicity the Postgres
//! adapter gets from a transaction.
//!
//! # Panics
//!
//! Methods may panic if the internal lock is poisoned. This is acceptable
//! for test code; this adapter should NOT be used in production.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::entitlement::{PremiumGrant, UserRecord};
use crate::domain::foundation::{DomainError, ErrorCode, FileRecordId, Timestamp, UserId};
use crate::domain::notification::TargetSegment;
use crate::domain::storage::FileRecord;
use crate::ports::{EntitlementStore, FileRecordStore, UserDirectory};

#[derive(Default)]
struct StoreState {
    users: HashMap<String, UserRecord>,
    grants: HashMap<String, PremiumGrant>,
    files: HashMap<FileRecordId, FileRecord>,
}

/// In-memory document store for testing.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user record.
    pub fn upsert_user(&self, user: UserRecord) {
        self.state
            .lock()
            .unwrap()
            .users
            .insert(user.id.to_string(), user);
    }

    /// Seeds a file record.
    pub fn insert_file(&self, record: FileRecord) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(record.record_id, record);
    }

    /// Reads a user record back for assertions.
    pub fn user(&self, user_id: &UserId) -> Option<UserRecord> {
        self.state.lock().unwrap().users.get(user_id.as_str()).cloned()
    }

    /// Number of grant records held.
    pub fn grant_count(&self) -> usize {
        self.state.lock().unwrap().grants.len()
    }

    /// Number of file records held.
    pub fn file_count(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }
}

#[async_trait]
impl EntitlementStore for InMemoryStore {
    async fn apply_grant(&self, grant: &PremiumGrant) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .get_mut(grant.user_id.as_str())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::UserNotFound,
                    format!("No user record for {}", grant.user_id),
                )
            })?;
        user.promote(grant.plan);
        state
            .grants
            .insert(grant.user_id.to_string(), grant.clone());
        Ok(())
    }

    async fn revoke_grant(&self, user_id: &UserId) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let user = state.users.get_mut(user_id.as_str()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::UserNotFound,
                format!("No user record for {}", user_id),
            )
        })?;
        user.demote();
        state.grants.remove(user_id.as_str());
        Ok(())
    }

    async fn find_grant(&self, user_id: &UserId) -> Result<Option<PremiumGrant>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .grants
            .get(user_id.as_str())
            .cloned())
    }

    async fn find_grant_by_payment(
        &self,
        payment_reference: &str,
    ) -> Result<Option<PremiumGrant>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .grants
            .values()
            .find(|g| g.payment_reference == payment_reference)
            .cloned())
    }

    async fn expired_grants(&self, now: Timestamp) -> Result<Vec<PremiumGrant>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .grants
            .values()
            .filter(|g| g.is_expired(now))
            .cloned()
            .collect())
    }

    async fn unbacked_premium_users(&self) -> Result<Vec<UserId>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .values()
            .filter(|u| u.is_premium && !state.grants.contains_key(u.id.as_str()))
            .map(|u| u.id.clone())
            .collect())
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.user(user_id))
    }

    async fn users_in_segment(
        &self,
        segment: TargetSegment,
    ) -> Result<Vec<UserRecord>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .values()
            .filter(|u| segment.includes(u.is_premium))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FileRecordStore for InMemoryStore {
    async fn stale_records(&self, cutoff: Timestamp) -> Result<Vec<FileRecord>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .files
            .values()
            .filter(|r| !r.is_premium && r.created_at.is_before(&cutoff))
            .cloned()
            .collect())
    }

    async fn delete_record(&self, record_id: &FileRecordId) -> Result<(), DomainError> {
        self.state.lock().unwrap().files.remove(record_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::entitlement::{
        GrantEntitlementCommand, GrantEntitlementHandler, SweepExpiredGrantsCommand,
        SweepExpiredGrantsHandler, SweepReport,
    };
    use crate::domain::entitlement::PremiumPlan;
    use crate::domain::foundation::CallerIdentity;
    use crate::ports::{Clock, PaymentError, PaymentProvider, PaymentStatus, PaymentVerification};
    use std::sync::Arc;

    struct AlwaysSucceededPayments;

    #[async_trait]
    impl PaymentProvider for AlwaysSucceededPayments {
        async fn retrieve_payment(
            &self,
            reference: &str,
        ) -> Result<PaymentVerification, PaymentError> {
            Ok(PaymentVerification {
                reference: reference.to_string(),
                status: PaymentStatus::Succeeded,
                amount_cents: 499,
            })
        }
    }

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    #[tokio::test]
    async fn paired_write_keeps_flag_and_grant_consistent() {
        let store = Arc::new(InMemoryStore::new());
        let user_id = UserId::new("user-1").unwrap();
        store.upsert_user(UserRecord::free(user_id.clone()));

        let grant = PremiumGrant::issue(
            user_id.clone(),
            PremiumPlan::Monthly,
            499,
            "pi_1",
            ts("2024-01-15T00:00:00Z"),
        );
        store.apply_grant(&grant).await.unwrap();
        assert!(store.user(&user_id).unwrap().is_premium);
        assert_eq!(store.grant_count(), 1);

        store.revoke_grant(&user_id).await.unwrap();
        assert!(!store.user(&user_id).unwrap().is_premium);
        assert_eq!(store.grant_count(), 0);
    }

    #[tokio::test]
    async fn apply_grant_requires_an_existing_user() {
        let store = InMemoryStore::new();
        let grant = PremiumGrant::issue(
            UserId::new("ghost").unwrap(),
            PremiumPlan::Monthly,
            499,
            "pi_1",
            ts("2024-01-15T00:00:00Z"),
        );

        let err = store.apply_grant(&grant).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    /// The full grant-then-expire lifecycle from the product scenario:
    /// a monthly plan bought on Jan 15 lapses on Feb 15; the Feb 16 sweep
    /// demotes the user and a repeat sweep finds nothing to do.
    #[tokio::test]
    async fn grant_sweep_lifecycle_end_to_end() {
        let store = Arc::new(InMemoryStore::new());
        let user_id = UserId::new("user-1").unwrap();
        store.upsert_user(UserRecord::free(user_id.clone()));

        let granter = GrantEntitlementHandler::new(
            store.clone(),
            Arc::new(AlwaysSucceededPayments),
            Arc::new(FixedClock(ts("2024-01-15T00:00:00Z"))),
        );
        let outcome = granter
            .handle(GrantEntitlementCommand {
                caller: Some(CallerIdentity::user(user_id.clone())),
                payment_reference: "pi_e2e".to_string(),
                plan: "monthly".to_string(),
            })
            .await
            .unwrap();
        assert!(outcome.granted);

        let grant = store.find_grant(&user_id).await.unwrap().unwrap();
        assert_eq!(grant.expiry_date, ts("2024-02-15T00:00:00Z"));
        assert!(store.user(&user_id).unwrap().is_premium);

        let sweeper = SweepExpiredGrantsHandler::new(store.clone());
        let now = ts("2024-02-16T00:00:00Z");
        let report = sweeper
            .handle(SweepExpiredGrantsCommand { now })
            .await
            .unwrap();
        assert_eq!(report.processed, 1);
        assert!(!store.user(&user_id).unwrap().is_premium);
        assert_eq!(store.grant_count(), 0);

        let repeat = sweeper
            .handle(SweepExpiredGrantsCommand { now })
            .await
            .unwrap();
        assert_eq!(repeat, SweepReport::default());
    }
}
