//! Persistence layer: slot storage and snapshot gateway.
//!
//! # Responsibility
//! - Define the durable key-value contract and its implementations.
//! - Isolate JSON snapshot encoding from service orchestration.
//!
//! # Invariants
//! - Only the gateway knows slot names and snapshot layout.
//! - Storage failures surface as `StorageError`; decode failures do not.

pub mod gateway;
pub mod kv_store;
