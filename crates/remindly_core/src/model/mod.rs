//! Domain model for tasks and the local user.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire shape (JSON snapshot layout) next to the types it describes.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Task status is a closed enum; unknown tags are errors.

pub mod status;
pub mod task;
pub mod user;
