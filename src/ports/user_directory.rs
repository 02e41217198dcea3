//! User directory port - read-side queries over user records.

use async_trait::async_trait;

use crate::domain::entitlement::UserRecord;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::notification::TargetSegment;

/// Port for user lookups and segment selection.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Looks up a single user.
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// All users in the given segment (premium/free filter on the
    /// current entitlement flag; `all` applies no filter).
    async fn users_in_segment(
        &self,
        segment: TargetSegment,
    ) -> Result<Vec<UserRecord>, DomainError>;
}
