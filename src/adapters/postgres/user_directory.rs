//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entitlement::{PremiumPlan, UserRecord};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::notification::TargetSegment;
use crate::ports::UserDirectory;

use super::store_error;

/// PostgreSQL implementation of the UserDirectory port.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Creates a new PgUserDirectory with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    is_premium: bool,
    premium_plan: Option<String>,
    push_token: Option<String>,
    admin: bool,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let premium_plan = row
            .premium_plan
            .map(|p| {
                p.parse::<PremiumPlan>().map_err(|_| {
                    DomainError::new(
                        ErrorCode::StoreError,
                        format!("Invalid plan value: {}", p),
                    )
                })
            })
            .transpose()?;
        let id = UserId::new(row.id)
            .map_err(|e| DomainError::new(ErrorCode::StoreError, format!("Invalid user_id: {}", e)))?;

        Ok(UserRecord {
            id,
            is_premium: row.is_premium,
            premium_plan,
            push_token: row.push_token,
            admin: row.admin,
        })
    }
}

const SELECT_USER: &str =
    "SELECT id, is_premium, premium_plan, push_token, admin FROM users";

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to fetch user", e))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn users_in_segment(
        &self,
        segment: TargetSegment,
    ) -> Result<Vec<UserRecord>, DomainError> {
        let sql = match segment {
            TargetSegment::All => SELECT_USER.to_string(),
            TargetSegment::Premium => format!("{} WHERE is_premium", SELECT_USER),
            TargetSegment::Free => format!("{} WHERE NOT is_premium", SELECT_USER),
        };

        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to query segment", e))?;

        rows.into_iter().map(UserRecord::try_from).collect()
    }
}
