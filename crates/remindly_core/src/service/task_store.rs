//! Authoritative in-memory task collection.
//!
//! # Responsibility
//! - Hold the ordered task list for the running session.
//! - Persist the full collection through the gateway after every mutation.
//!
//! # Invariants
//! - Seeded from the gateway exactly once, in `TaskStore::open`.
//! - Insertion order is preserved; `update` keeps the record's position.
//! - A failed save leaves the in-memory collection unchanged.
//! - `update` and `remove` on an unknown id are silent no-ops.

use crate::model::task::{Task, TaskId};
use crate::repo::gateway::PersistenceGateway;
use crate::repo::kv_store::StorageResult;
use log::{debug, error, info};

/// Single owner of the task collection.
pub struct TaskStore {
    gateway: PersistenceGateway,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates the store and seeds it from persisted state.
    pub async fn open(gateway: PersistenceGateway) -> StorageResult<Self> {
        let tasks = gateway.load_tasks().await?;
        info!(
            "event=task_store_open module=task_store status=ok count={}",
            tasks.len()
        );
        Ok(Self { gateway, tasks })
    }

    /// Owned snapshot of the collection in insertion order.
    pub fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends `task` and persists the collection.
    pub async fn add(&mut self, task: Task) -> StorageResult<()> {
        let task_id = task.id;
        let mut next = self.tasks.clone();
        next.push(task);
        self.commit("task_add", next).await?;
        debug!("event=task_add module=task_store status=ok task_id={task_id}");
        Ok(())
    }

    /// Replaces the record with the same id and persists the collection.
    ///
    /// Returns `false` when no record matched; the collection is unchanged
    /// but still re-saved.
    pub async fn update(&mut self, task: Task) -> StorageResult<bool> {
        let task_id = task.id;
        let mut next = self.tasks.clone();
        let matched = match next.iter_mut().find(|existing| existing.id == task_id) {
            Some(existing) => {
                *existing = task;
                true
            }
            None => false,
        };
        self.commit("task_update", next).await?;
        debug!(
            "event=task_update module=task_store status=ok task_id={} matched={}",
            task_id, matched
        );
        Ok(matched)
    }

    /// Removes the record with `id` and persists the collection.
    ///
    /// Returns `false` when nothing was removed.
    pub async fn remove(&mut self, id: TaskId) -> StorageResult<bool> {
        let mut next = self.tasks.clone();
        let before = next.len();
        next.retain(|task| task.id != id);
        let removed = next.len() != before;
        self.commit("task_remove", next).await?;
        debug!(
            "event=task_remove module=task_store status=ok task_id={} removed={}",
            id, removed
        );
        Ok(removed)
    }

    /// Drops every task and erases the `tasks` slot.
    pub async fn clear(&mut self) -> StorageResult<()> {
        if let Err(err) = self.gateway.clear_tasks().await {
            error!("event=task_clear module=task_store status=error error={err}");
            return Err(err);
        }
        self.tasks.clear();
        info!("event=task_clear module=task_store status=ok");
        Ok(())
    }

    /// Empties the in-memory list without touching storage.
    pub fn forget_all(&mut self) {
        self.tasks.clear();
        debug!("event=task_forget module=task_store status=ok");
    }

    async fn commit(&mut self, event: &'static str, next: Vec<Task>) -> StorageResult<()> {
        if let Err(err) = self.gateway.save_tasks(&next).await {
            error!("event={event} module=task_store status=error error={err}");
            return Err(err);
        }
        self.tasks = next;
        Ok(())
    }
}
