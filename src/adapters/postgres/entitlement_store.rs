//! PostgreSQL implementation of EntitlementStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entitlement::{PremiumGrant, PremiumPlan};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::EntitlementStore;

use super::store_error;

/// PostgreSQL implementation of the EntitlementStore port.
///
/// Each paired write (user flag + grant record) runs inside one
/// transaction, so a concurrent grant and sweep for the same user can
/// never observe the flag and the grant record disagreeing.
pub struct PgEntitlementStore {
    pool: PgPool,
}

impl PgEntitlementStore {
    /// Creates a new PgEntitlementStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a premium grant.
#[derive(Debug, sqlx::FromRow)]
struct GrantRow {
    user_id: String,
    plan: String,
    amount_cents: i64,
    payment_reference: String,
    granted_at: DateTime<Utc>,
    expiry_date: DateTime<Utc>,
}

impl TryFrom<GrantRow> for PremiumGrant {
    type Error = DomainError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        let plan: PremiumPlan = row.plan.parse().map_err(|_| {
            DomainError::new(
                ErrorCode::StoreError,
                format!("Invalid plan value: {}", row.plan),
            )
        })?;
        let user_id = UserId::new(row.user_id)
            .map_err(|e| DomainError::new(ErrorCode::StoreError, format!("Invalid user_id: {}", e)))?;

        Ok(PremiumGrant {
            user_id,
            plan,
            amount_cents: row.amount_cents,
            payment_reference: row.payment_reference,
            granted_at: Timestamp::from_datetime(row.granted_at),
            expiry_date: Timestamp::from_datetime(row.expiry_date),
        })
    }
}

const SELECT_GRANT: &str =
    "SELECT user_id, plan, amount_cents, payment_reference, granted_at, expiry_date
     FROM premium_grants";

#[async_trait]
impl EntitlementStore for PgEntitlementStore {
    async fn apply_grant(&self, grant: &PremiumGrant) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        let updated = sqlx::query(
            "UPDATE users SET is_premium = TRUE, premium_plan = $2 WHERE id = $1",
        )
        .bind(grant.user_id.as_str())
        .bind(grant.plan.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("Failed to promote user", e))?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("No user record for {}", grant.user_id),
            ));
        }

        sqlx::query(
            "INSERT INTO premium_grants
                 (user_id, plan, amount_cents, payment_reference, granted_at, expiry_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id) DO UPDATE SET
                 plan = EXCLUDED.plan,
                 amount_cents = EXCLUDED.amount_cents,
                 payment_reference = EXCLUDED.payment_reference,
                 granted_at = EXCLUDED.granted_at,
                 expiry_date = EXCLUDED.expiry_date",
        )
        .bind(grant.user_id.as_str())
        .bind(grant.plan.as_str())
        .bind(grant.amount_cents)
        .bind(&grant.payment_reference)
        .bind(grant.granted_at.as_datetime())
        .bind(grant.expiry_date.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("Failed to upsert grant", e))?;

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit grant", e))
    }

    async fn revoke_grant(&self, user_id: &UserId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        let updated = sqlx::query(
            "UPDATE users SET is_premium = FALSE, premium_plan = NULL WHERE id = $1",
        )
        .bind(user_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("Failed to demote user", e))?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("No user record for {}", user_id),
            ));
        }

        // Absent-is-ok: revoke is idempotent and also corrects a premium
        // flag that has no grant record behind it
        sqlx::query("DELETE FROM premium_grants WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to delete grant", e))?;

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit revocation", e))
    }

    async fn find_grant(&self, user_id: &UserId) -> Result<Option<PremiumGrant>, DomainError> {
        let row: Option<GrantRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_GRANT))
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error("Failed to fetch grant", e))?;

        row.map(PremiumGrant::try_from).transpose()
    }

    async fn find_grant_by_payment(
        &self,
        payment_reference: &str,
    ) -> Result<Option<PremiumGrant>, DomainError> {
        let row: Option<GrantRow> =
            sqlx::query_as(&format!("{} WHERE payment_reference = $1", SELECT_GRANT))
                .bind(payment_reference)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error("Failed to fetch grant by payment", e))?;

        row.map(PremiumGrant::try_from).transpose()
    }

    async fn expired_grants(&self, now: Timestamp) -> Result<Vec<PremiumGrant>, DomainError> {
        let rows: Vec<GrantRow> =
            sqlx::query_as(&format!("{} WHERE expiry_date < $1", SELECT_GRANT))
                .bind(now.as_datetime())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| store_error("Failed to query expired grants", e))?;

        rows.into_iter().map(PremiumGrant::try_from).collect()
    }

    async fn unbacked_premium_users(&self) -> Result<Vec<UserId>, DomainError> {
        let ids: Vec<(String,)> = sqlx::query_as(
            "SELECT u.id FROM users u
             LEFT JOIN premium_grants g ON g.user_id = u.id
             WHERE u.is_premium AND g.user_id IS NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to query unbacked premium users", e))?;

        ids.into_iter()
            .map(|(id,)| {
                UserId::new(id).map_err(|e| {
                    DomainError::new(ErrorCode::StoreError, format!("Invalid user_id: {}", e))
                })
            })
            .collect()
    }
}
