//! Snapshot persistence for the user profile and task collection.
//!
//! # Responsibility
//! - Serialize in-memory state into the `user` and `tasks` slots.
//! - Decode persisted snapshots back into typed values.
//!
//! # Invariants
//! - Every save writes one complete snapshot; there is no incremental diff.
//! - Missing or corrupt snapshots decode to "absent"/empty, never an error.
//! - Storage-layer failures are returned as `StorageError`.

use crate::model::task::Task;
use crate::model::user::User;
use crate::repo::kv_store::{KeyValueStore, StorageError, StorageResult};
use log::{debug, warn};
use std::sync::Arc;

pub const USER_SLOT: &str = "user";
pub const TASKS_SLOT: &str = "tasks";

/// Sole sync point between in-memory state and durable storage.
#[derive(Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the persisted user.
    ///
    /// Returns `Ok(None)` when the slot is missing or cannot be parsed.
    pub async fn load_user(&self) -> StorageResult<Option<User>> {
        let Some(raw) = self.store.get(USER_SLOT).await? else {
            debug!("event=snapshot_load module=gateway slot=user status=missing");
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(
                    "event=snapshot_load module=gateway slot=user status=corrupt error={}",
                    err
                );
                Ok(None)
            }
        }
    }

    pub async fn save_user(&self, user: &User) -> StorageResult<()> {
        let raw = serde_json::to_string(user).map_err(|source| StorageError::Encode {
            slot: USER_SLOT,
            source,
        })?;
        self.store.set(USER_SLOT, &raw).await
    }

    pub async fn clear_user(&self) -> StorageResult<()> {
        self.store.remove(USER_SLOT).await
    }

    /// Loads the persisted task collection in stored order.
    ///
    /// A corrupt snapshot yields an empty collection. Individually invalid
    /// entries are dropped so the remaining tasks stay usable.
    pub async fn load_tasks(&self) -> StorageResult<Vec<Task>> {
        let Some(raw) = self.store.get(TASKS_SLOT).await? else {
            debug!("event=snapshot_load module=gateway slot=tasks status=missing");
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "event=snapshot_load module=gateway slot=tasks status=corrupt error={}",
                    err
                );
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let tasks = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Task>(entry) {
                Ok(task) => Some(task),
                Err(err) => {
                    warn!(
                        "event=snapshot_load module=gateway slot=tasks status=entry_dropped index={} error={}",
                        index, err
                    );
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "event=snapshot_load module=gateway slot=tasks status=ok loaded={} total={}",
            tasks.len(),
            total
        );
        Ok(tasks)
    }

    pub async fn save_tasks(&self, tasks: &[Task]) -> StorageResult<()> {
        let raw = serde_json::to_string(tasks).map_err(|source| StorageError::Encode {
            slot: TASKS_SLOT,
            source,
        })?;
        self.store.set(TASKS_SLOT, &raw).await
    }

    pub async fn clear_tasks(&self) -> StorageResult<()> {
        self.store.remove(TASKS_SLOT).await
    }
}
