//! CloudLocker Entitlement Backend
//!
//! This crate manages premium entitlements for the CloudLocker file storage
//! app: payment-confirmed grants, scheduled expiry and storage-retention
//! sweeps, and admin notification fan-out.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
