//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Store implementations backed by PostgreSQL
//! - `memory` - In-memory store implementations for testing
//! - `fs` - Local filesystem blob store
//! - `stripe` - Payment provider adapter
//! - `fcm` - Push sender adapter
//! - `auth` - Bearer-token identity verification
//! - `http` - Axum routes exposing the caller-facing operations

pub mod auth;
pub mod fcm;
pub mod fs;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
