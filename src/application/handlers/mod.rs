//! Command handlers for the four entitlement-core operations.

pub mod entitlement;
pub mod notification;
pub mod storage;
