//! PostgreSQL implementations of the store ports.
//!
//! The User/PremiumGrant pair lives in two tables; `PgEntitlementStore`
//! wraps each paired write in a transaction, which is the atomic
//! conditional multi-record write the ports require.

mod entitlement_store;
mod file_record_store;
mod user_directory;

pub use entitlement_store::PgEntitlementStore;
pub use file_record_store::PgFileRecordStore;
pub use user_directory::PgUserDirectory;

use crate::domain::foundation::DomainError;

/// Maps a sqlx error to a store-level domain error.
fn store_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::store(format!("{}: {}", context, err))
}
