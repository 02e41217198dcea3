//! Local filesystem adapter for the blob store port.

mod blob_store;

pub use blob_store::FsBlobStore;
