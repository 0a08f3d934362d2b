//! Read-only projections for list screens.
//!
//! # Responsibility
//! - Filter and group tasks the way the list screen renders them.
//! - Format reminder times relative to now.
//!
//! # Invariants
//! - Projections never mutate or persist task state.

pub mod relative;
pub mod search;
