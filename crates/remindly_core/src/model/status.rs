//! Task status and its transition rule.
//!
//! # Responsibility
//! - Define the closed set of task lifecycle states.
//! - Provide the fixed status cycle used by the "tap badge" interaction.
//! - Own the canonical wire tag, label and display color for each state.
//!
//! # Invariants
//! - `next` is total and cyclic with period 3: TODO -> IN_PROGRESS -> DONE -> TODO.
//! - Unknown wire tags are rejected, never mapped to a default state.

use super::task::TaskValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// All states in display order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the next state in the fixed cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }

    /// Canonical wire tag, also used as the section heading.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Badge color as `#RRGGBB`.
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Todo => "#9CA3AF",
            Self::InProgress => "#3B82F6",
            Self::Done => "#10B981",
        }
    }
}

/// Applies the transition rule to a raw wire tag.
///
/// # Errors
/// - Returns `TaskValidationError::UnknownStatus` when `tag` is not one of
///   `TODO|IN_PROGRESS|DONE`.
pub fn next_status_tag(tag: &str) -> Result<TaskStatus, TaskValidationError> {
    Ok(tag.parse::<TaskStatus>()?.next())
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            other => Err(TaskValidationError::UnknownStatus(other.to_string())),
        }
    }
}
