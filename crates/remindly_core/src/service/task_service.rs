//! Task use-case service.
//!
//! # Responsibility
//! - Validate task submissions before they reach the store.
//! - Run the reminder protocol around create/edit/delete.
//! - Provide status shortcuts (cycle, mark done) for list interactions.
//!
//! # Invariants
//! - Only validation and storage failures reach the caller.
//! - The task's notification handle is settled before the record is saved.
//! - A stored handle is detached from the record (and committed) before it
//!   is cancelled, so a failed save never leaves a dead handle behind.
//! - Status shortcuts never touch the task's reminder.

use crate::model::status::TaskStatus;
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::kv_store::StorageError;
use crate::service::reminder::{ReminderScheduler, ScheduleOutcome};
use crate::service::task_store::TaskStore;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Submission rejected before any side effect.
    Validation(TaskValidationError),
    /// Durable storage failed; in-memory state is unchanged.
    Storage(StorageError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for TaskServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Form input for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub status: TaskStatus,
    /// Requested reminder; only its local time of day is used.
    pub due_time: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_time(mut self, due_time: DateTime<Utc>) -> Self {
        self.due_time = Some(due_time);
        self
    }

    fn normalized_title(&self) -> Result<String, TaskValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(title.to_string())
    }
}

/// Orchestrates the task store and reminder scheduler.
pub struct TaskService {
    store: TaskStore,
    scheduler: ReminderScheduler,
}

impl TaskService {
    pub fn new(store: TaskStore, scheduler: ReminderScheduler) -> Self {
        Self { store, scheduler }
    }

    pub fn list(&self) -> Vec<Task> {
        self.store.list()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Creates a task from `draft`, scheduling its reminder when due.
    ///
    /// # Errors
    /// - `Validation` for a blank title (nothing scheduled, nothing saved).
    /// - `Storage` when the save fails; any reminder just scheduled is
    ///   cancelled again.
    pub async fn create_task(&mut self, draft: TaskDraft) -> TaskServiceResult<Task> {
        let mut task = Task::new(draft.normalized_title()?);
        task.status = draft.status;
        task.due_time = draft.due_time;

        let outcome = self.scheduler.reconcile(None, &mut task).await;
        log_outcome("task_create", &task, outcome.as_ref());

        if let Err(err) = self.store.add(task.clone()).await {
            self.rollback_handle(&task).await;
            return Err(err.into());
        }
        info!(
            "event=task_create module=task_service status=ok task_id={}",
            task.id
        );
        Ok(task)
    }

    /// Replaces title, status and due time of task `id`.
    ///
    /// The previous reminder is cancelled before a new one is requested.
    /// Returns `Ok(None)` when `id` is unknown; nothing is scheduled then.
    ///
    /// # Errors
    /// - `Storage` before the old reminder is touched: task and reminder are
    ///   unchanged.
    /// - `Storage` after rescheduling: the fresh reminder is cancelled again
    ///   and the stored task carries no handle.
    pub async fn edit_task(
        &mut self,
        id: TaskId,
        draft: TaskDraft,
    ) -> TaskServiceResult<Option<Task>> {
        let title = draft.normalized_title()?;
        let Some(previous) = self.store.get(id).cloned() else {
            debug!("event=task_edit module=task_service status=miss task_id={id}");
            return Ok(None);
        };

        let mut task = Task {
            id,
            title,
            status: draft.status,
            due_time: draft.due_time,
            notification_id: None,
        };
        if previous.notification_id.is_some() {
            self.store.update(task.clone()).await?;
        }
        let outcome = self
            .scheduler
            .reconcile(previous.notification_id.as_deref(), &mut task)
            .await;
        log_outcome("task_edit", &task, outcome.as_ref());

        if let Err(err) = self.store.update(task.clone()).await {
            self.rollback_handle(&task).await;
            return Err(err.into());
        }
        info!("event=task_edit module=task_service status=ok task_id={id}");
        Ok(Some(task))
    }

    /// Full-record replace without touching reminders.
    ///
    /// Returns `false` when no task has `task.id`.
    pub async fn update_task(&mut self, task: Task) -> TaskServiceResult<bool> {
        task.validate()?;
        Ok(self.store.update(task).await?)
    }

    /// Advances task `id` one step through the status cycle.
    pub async fn cycle_status(&mut self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        self.set_status(id, |status| status.next()).await
    }

    /// Sets task `id` to `DONE` regardless of its current status.
    pub async fn mark_done(&mut self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        self.set_status(id, |_| TaskStatus::Done).await
    }

    /// Cancels the task's reminder, then removes it.
    ///
    /// Returns `false` when `id` is unknown. When the removal fails after
    /// the reminder was cancelled, the task stays without a handle.
    pub async fn delete_task(&mut self, id: TaskId) -> TaskServiceResult<bool> {
        if let Some(mut detached) = self
            .store
            .get(id)
            .filter(|task| task.notification_id.is_some())
            .cloned()
        {
            let handle = detached.notification_id.take();
            self.store.update(detached).await?;
            if let Some(handle) = handle {
                self.scheduler.cancel(&handle).await;
            }
        }
        let removed = self.store.remove(id).await?;
        info!(
            "event=task_delete module=task_service status=ok task_id={} removed={}",
            id, removed
        );
        Ok(removed)
    }

    /// Best-effort cancellation of every pending reminder.
    pub async fn cancel_all_reminders(&self) {
        for task in self.store.list() {
            if let Some(handle) = task.notification_id.as_deref() {
                self.scheduler.cancel(handle).await;
            }
        }
    }

    /// Drops the in-memory tasks once their slot has been erased elsewhere.
    pub fn forget_all(&mut self) {
        self.store.forget_all();
    }

    async fn set_status(
        &mut self,
        id: TaskId,
        next: impl FnOnce(TaskStatus) -> TaskStatus,
    ) -> TaskServiceResult<Option<Task>> {
        let Some(mut task) = self.store.get(id).cloned() else {
            return Ok(None);
        };
        task.status = next(task.status);
        self.store.update(task.clone()).await?;
        debug!(
            "event=task_status module=task_service status=ok task_id={} value={}",
            id, task.status
        );
        Ok(Some(task))
    }

    async fn rollback_handle(&self, task: &Task) {
        if let Some(handle) = task.notification_id.as_deref() {
            warn!(
                "event=task_save module=task_service status=rollback task_id={}",
                task.id
            );
            self.scheduler.cancel(handle).await;
        }
    }
}

fn log_outcome(event: &str, task: &Task, outcome: Option<&ScheduleOutcome>) {
    match outcome {
        Some(ScheduleOutcome::Failed { .. }) => warn!(
            "event={} module=task_service status=reminder_failed task_id={}",
            event, task.id
        ),
        Some(_) | None => debug!(
            "event={} module=task_service status=reminder_settled task_id={} state={:?}",
            event,
            task.id,
            task.reminder_state()
        ),
    }
}
