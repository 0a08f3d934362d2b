//! Application service object handed to UI collaborators.
//!
//! # Responsibility
//! - Build session, task store and scheduler once at process start.
//! - Own logout, which spans session and task state.
//!
//! # Invariants
//! - No global state: callers keep the `ReminderApp` and pass it around.
//! - Each persisted slot is read exactly once, during `open`.

use crate::clock::Clock;
use crate::notify::{ConfirmationSink, Notifier, PermissionStatus, PlatformProfile};
use crate::repo::gateway::PersistenceGateway;
use crate::repo::kv_store::{KeyValueStore, StorageResult};
use crate::service::reminder::ReminderScheduler;
use crate::service::session::SessionHolder;
use crate::service::task_service::{TaskService, TaskServiceResult};
use crate::service::task_store::TaskStore;
use log::info;
use std::sync::Arc;

/// Host collaborators required to run the core.
pub struct AppDeps {
    pub storage: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
    pub confirmations: Arc<dyn ConfirmationSink>,
    pub clock: Arc<dyn Clock>,
    pub platform: PlatformProfile,
}

pub struct ReminderApp {
    session: SessionHolder,
    tasks: TaskService,
}

impl ReminderApp {
    /// Loads persisted user and tasks and wires the scheduler.
    pub async fn open(deps: AppDeps) -> StorageResult<Self> {
        let gateway = PersistenceGateway::new(deps.storage);
        let session = SessionHolder::open(gateway.clone()).await?;
        let store = TaskStore::open(gateway).await?;
        let scheduler = ReminderScheduler::new(
            deps.notifier,
            deps.confirmations,
            deps.clock,
            deps.platform,
        );
        info!(
            "event=app_open module=app status=ok platform={:?} physical_device={}",
            deps.platform.platform, deps.platform.is_physical_device
        );
        Ok(Self {
            session,
            tasks: TaskService::new(store, scheduler),
        })
    }

    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionHolder {
        &mut self.session
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskService {
        &mut self.tasks
    }

    /// Startup permission check for reminders.
    pub async fn ensure_notification_permission(&self) -> PermissionStatus {
        self.tasks.scheduler().ensure_permission().await
    }

    /// Signs the user out: erases both persisted slots, cancels pending
    /// reminders and resets in-memory state to empty defaults.
    ///
    /// Reminders are only cancelled once the `tasks` slot is gone, so a
    /// failed logout leaves every remaining task with a live reminder.
    pub async fn logout(&mut self) -> TaskServiceResult<()> {
        self.session.clear().await?;
        self.tasks.cancel_all_reminders().await;
        self.tasks.forget_all();
        info!("event=logout module=app status=ok");
        Ok(())
    }
}
