//! Core use-case services.
//!
//! # Responsibility
//! - Own in-memory session and task state for the running process.
//! - Orchestrate persistence and reminder scheduling into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage and platform details.

pub mod reminder;
pub mod session;
pub mod task_service;
pub mod task_store;
