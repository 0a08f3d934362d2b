//! Single-user session identity.

use serde::{Deserialize, Serialize};

/// The one local user. An empty `name` means onboarding has not happened.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Onboarding gate signal: `true` once a non-blank name is set.
    pub fn is_onboarded(&self) -> bool {
        !self.name.trim().is_empty()
    }
}
