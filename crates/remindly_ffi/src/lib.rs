//! Flutter bridge for the Remindly core.

pub mod api;
