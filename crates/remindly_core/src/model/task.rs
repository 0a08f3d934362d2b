//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, scheduler and UI.
//! - Validate submission-time invariants before a task reaches the store.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is never blank.
//! - `notification_id` is present only while a reminder is pending.
//! - Deserialization applies the same validation as construction.

use super::status::TaskStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task and join key to its scheduled reminder.
pub type TaskId = Uuid;

/// Opaque handle returned by the notification subsystem.
pub type NotificationHandle = String;

/// Validation error for task submissions and persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    EmptyTitle,
    UnknownStatus(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id cannot be nil"),
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::UnknownStatus(tag) => {
                write!(f, "unknown task status `{tag}`; expected TODO|IN_PROGRESS|DONE")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Whether a task currently owns a live platform reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    None,
    Scheduled,
}

/// Canonical task record.
///
/// Serialized with camelCase keys; `dueTime` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskWire", into = "TaskWire")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    /// Instant whose local time of day is the requested reminder time.
    pub due_time: Option<DateTime<Utc>>,
    pub notification_id: Option<NotificationHandle>,
}

impl Task {
    /// Creates a `TODO` task with a freshly generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: TaskStatus::Todo,
            due_time: None,
            notification_id: None,
        }
    }

    /// Creates a task with a caller-provided id.
    ///
    /// # Errors
    /// - `NilId` when `id` is nil.
    /// - `EmptyTitle` when `title` is blank.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        status: TaskStatus,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: title.into(),
            status,
            due_time: None,
            notification_id: None,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Derived notification state.
    pub fn reminder_state(&self) -> ReminderState {
        match self.notification_id {
            Some(_) => ReminderState::Scheduled,
            None => ReminderState::None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskWire {
    id: TaskId,
    title: String,
    status: TaskStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    due_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notification_id: Option<NotificationHandle>,
}

impl TryFrom<TaskWire> for Task {
    type Error = TaskValidationError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let task = Self {
            id: wire.id,
            title: wire.title,
            status: wire.status,
            due_time: wire.due_time,
            // An empty handle means nothing is scheduled.
            notification_id: wire.notification_id.filter(|handle| !handle.is_empty()),
        };
        task.validate()?;
        Ok(task)
    }
}

impl From<Task> for TaskWire {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            status: task.status,
            due_time: task.due_time,
            notification_id: task.notification_id,
        }
    }
}
