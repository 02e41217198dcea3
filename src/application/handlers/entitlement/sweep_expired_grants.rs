//! SweepExpiredGrantsHandler - Scheduled demotion of lapsed premium users.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::EntitlementStore;

/// Command for one sweep run. The scheduler supplies `now` so overlapping
/// runs observe a consistent cutoff.
#[derive(Debug, Clone, Copy)]
pub struct SweepExpiredGrantsCommand {
    pub now: Timestamp,
}

/// Counters from one sweep run, logged for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Expired grants revoked.
    pub processed: usize,
    /// Records that faulted and were left for the next run.
    pub failed: usize,
    /// Premium flags corrected that had no grant record behind them.
    pub reconciled: usize,
}

/// Handler for the nightly premium-expiry sweep.
///
/// Invoked by the external scheduler every 24 hours. Each expired grant
/// is revoked through one atomic paired write; per-record faults are
/// logged and counted, never aborting the run - the next tick retries
/// whatever is still eligible. A second pass corrects users left
/// premium with no grant record behind the flag.
pub struct SweepExpiredGrantsHandler {
    store: Arc<dyn EntitlementStore>,
}

impl SweepExpiredGrantsHandler {
    pub fn new(store: Arc<dyn EntitlementStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SweepExpiredGrantsCommand,
    ) -> Result<SweepReport, DomainError> {
        let mut report = SweepReport::default();

        let expired = self.store.expired_grants(cmd.now).await?;
        for grant in &expired {
            match self.store.revoke_grant(&grant.user_id).await {
                Ok(()) => {
                    report.processed += 1;
                    tracing::info!(
                        user_id = %grant.user_id,
                        expiry_date = %grant.expiry_date,
                        "premium entitlement expired, user demoted"
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(
                        user_id = %grant.user_id,
                        error = %err,
                        "failed to revoke expired grant, left for next run"
                    );
                }
            }
        }

        // Correct any premium flag left behind by a crash between paired
        // writes on a store without native transactions.
        let unbacked = self.store.unbacked_premium_users().await?;
        for user_id in &unbacked {
            match self.store.revoke_grant(user_id).await {
                Ok(()) => {
                    report.reconciled += 1;
                    tracing::warn!(
                        user_id = %user_id,
                        "premium flag had no grant record, demoted during reconciliation"
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(
                        user_id = %user_id,
                        error = %err,
                        "failed to reconcile unbacked premium flag, left for next run"
                    );
                }
            }
        }

        tracing::info!(
            processed = report.processed,
            failed = report.failed,
            reconciled = report.reconciled,
            "premium expiry sweep completed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{PremiumGrant, PremiumPlan, UserRecord};
    use crate::domain::foundation::UserId;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    /// Paired-state mock: tracks users and grants together so the tests
    /// can assert the pair stays consistent across revocations.
    struct MockEntitlementStore {
        users: Mutex<HashMap<String, UserRecord>>,
        grants: Mutex<HashMap<String, PremiumGrant>>,
        fail_revoke_for: Mutex<Option<UserId>>,
    }

    impl MockEntitlementStore {
        fn new() -> Self {
            Self {
                users: Mutex::new(HashMap::new()),
                grants: Mutex::new(HashMap::new()),
                fail_revoke_for: Mutex::new(None),
            }
        }

        fn seed_premium(&self, user_id: &UserId, grant: PremiumGrant) {
            let mut user = UserRecord::free(user_id.clone());
            user.promote(grant.plan);
            self.users
                .lock()
                .unwrap()
                .insert(user_id.to_string(), user);
            self.grants
                .lock()
                .unwrap()
                .insert(user_id.to_string(), grant);
        }

        /// Premium flag set with no grant record - the split-state residue.
        fn seed_unbacked_premium(&self, user_id: &UserId) {
            let mut user = UserRecord::free(user_id.clone());
            user.promote(PremiumPlan::Monthly);
            self.users
                .lock()
                .unwrap()
                .insert(user_id.to_string(), user);
        }

        fn fail_revokes_for(&self, user_id: UserId) {
            *self.fail_revoke_for.lock().unwrap() = Some(user_id);
        }

        fn user(&self, user_id: &UserId) -> UserRecord {
            self.users
                .lock()
                .unwrap()
                .get(user_id.as_str())
                .cloned()
                .unwrap()
        }

        fn grant_count(&self) -> usize {
            self.grants.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EntitlementStore for MockEntitlementStore {
        async fn apply_grant(&self, grant: &PremiumGrant) -> Result<(), DomainError> {
            self.seed_premium(&grant.user_id, grant.clone());
            Ok(())
        }

        async fn revoke_grant(&self, user_id: &UserId) -> Result<(), DomainError> {
            if self.fail_revoke_for.lock().unwrap().as_ref() == Some(user_id) {
                return Err(DomainError::store("Simulated revoke failure"));
            }
            if let Some(user) = self.users.lock().unwrap().get_mut(user_id.as_str()) {
                user.demote();
            }
            self.grants.lock().unwrap().remove(user_id.as_str());
            Ok(())
        }

        async fn find_grant(
            &self,
            user_id: &UserId,
        ) -> Result<Option<PremiumGrant>, DomainError> {
            Ok(self.grants.lock().unwrap().get(user_id.as_str()).cloned())
        }

        async fn find_grant_by_payment(
            &self,
            payment_reference: &str,
        ) -> Result<Option<PremiumGrant>, DomainError> {
            Ok(self
                .grants
                .lock()
                .unwrap()
                .values()
                .find(|g| g.payment_reference == payment_reference)
                .cloned())
        }

        async fn expired_grants(
            &self,
            now: Timestamp,
        ) -> Result<Vec<PremiumGrant>, DomainError> {
            Ok(self
                .grants
                .lock()
                .unwrap()
                .values()
                .filter(|g| g.is_expired(now))
                .cloned()
                .collect())
        }

        async fn unbacked_premium_users(&self) -> Result<Vec<UserId>, DomainError> {
            let grants = self.grants.lock().unwrap();
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| u.is_premium && !grants.contains_key(u.id.as_str()))
                .map(|u| u.id.clone())
                .collect())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    fn user(n: u32) -> UserId {
        UserId::new(format!("user-{}", n)).unwrap()
    }

    fn grant_for(user_id: &UserId, granted_at: &str) -> PremiumGrant {
        PremiumGrant::issue(
            user_id.clone(),
            PremiumPlan::Monthly,
            499,
            format!("pi_{}", user_id),
            ts(granted_at),
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn expired_grant_demotes_user_and_deletes_grant() {
        let store = Arc::new(MockEntitlementStore::new());
        let u = user(1);
        // monthly grant on Jan 15 expires Feb 15
        store.seed_premium(&u, grant_for(&u, "2024-01-15T00:00:00Z"));

        let handler = SweepExpiredGrantsHandler::new(store.clone());
        let report = handler
            .handle(SweepExpiredGrantsCommand {
                now: ts("2024-02-16T00:00:00Z"),
            })
            .await
            .unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 0);
        assert!(!store.user(&u).is_premium);
        assert_eq!(store.user(&u).premium_plan, None);
        assert_eq!(store.grant_count(), 0);
    }

    #[tokio::test]
    async fn unexpired_grant_is_untouched() {
        let store = Arc::new(MockEntitlementStore::new());
        let u = user(1);
        store.seed_premium(&u, grant_for(&u, "2024-01-15T00:00:00Z"));

        let handler = SweepExpiredGrantsHandler::new(store.clone());
        let report = handler
            .handle(SweepExpiredGrantsCommand {
                now: ts("2024-02-01T00:00:00Z"),
            })
            .await
            .unwrap();

        assert_eq!(report.processed, 0);
        assert!(store.user(&u).is_premium);
        assert_eq!(store.grant_count(), 1);
    }

    #[tokio::test]
    async fn second_sweep_with_same_now_is_a_no_op() {
        let store = Arc::new(MockEntitlementStore::new());
        let u = user(1);
        store.seed_premium(&u, grant_for(&u, "2024-01-15T00:00:00Z"));

        let handler = SweepExpiredGrantsHandler::new(store.clone());
        let now = ts("2024-02-16T00:00:00Z");

        let first = handler.handle(SweepExpiredGrantsCommand { now }).await.unwrap();
        let second = handler.handle(SweepExpiredGrantsCommand { now }).await.unwrap();

        assert_eq!(first.processed, 1);
        assert_eq!(second, SweepReport::default());
    }

    #[tokio::test]
    async fn per_record_failure_does_not_abort_the_run() {
        let store = Arc::new(MockEntitlementStore::new());
        let failing = user(1);
        let healthy = user(2);
        store.seed_premium(&failing, grant_for(&failing, "2024-01-01T00:00:00Z"));
        store.seed_premium(&healthy, grant_for(&healthy, "2024-01-01T00:00:00Z"));
        store.fail_revokes_for(failing.clone());

        let handler = SweepExpiredGrantsHandler::new(store.clone());
        let report = handler
            .handle(SweepExpiredGrantsCommand {
                now: ts("2024-03-01T00:00:00Z"),
            })
            .await
            .unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);
        assert!(!store.user(&healthy).is_premium);
        // The faulted record stays eligible for the next run
        assert!(store.user(&failing).is_premium);
        assert_eq!(store.grant_count(), 1);
    }

    #[tokio::test]
    async fn unbacked_premium_flag_is_reconciled() {
        let store = Arc::new(MockEntitlementStore::new());
        let stale = user(1);
        store.seed_unbacked_premium(&stale);

        let handler = SweepExpiredGrantsHandler::new(store.clone());
        let report = handler
            .handle(SweepExpiredGrantsCommand {
                now: ts("2024-02-16T00:00:00Z"),
            })
            .await
            .unwrap();

        assert_eq!(report.processed, 0);
        assert_eq!(report.reconciled, 1);
        assert!(!store.user(&stale).is_premium);
    }

    #[tokio::test]
    async fn mixed_run_counts_each_outcome() {
        let store = Arc::new(MockEntitlementStore::new());
        let expired = user(1);
        let current = user(2);
        let stale = user(3);
        store.seed_premium(&expired, grant_for(&expired, "2024-01-01T00:00:00Z"));
        store.seed_premium(&current, grant_for(&current, "2024-02-10T00:00:00Z"));
        store.seed_unbacked_premium(&stale);

        let handler = SweepExpiredGrantsHandler::new(store.clone());
        let report = handler
            .handle(SweepExpiredGrantsCommand {
                now: ts("2024-02-16T00:00:00Z"),
            })
            .await
            .unwrap();

        assert_eq!(
            report,
            SweepReport {
                processed: 1,
                failed: 0,
                reconciled: 1,
            }
        );
        assert!(store.user(&current).is_premium);
    }
}
