//! Core domain logic for Remindly.
//! This crate is the single source of truth for task and reminder invariants.

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod view;

pub use app::{AppDeps, ReminderApp};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::status::{next_status_tag, TaskStatus};
pub use model::task::{NotificationHandle, ReminderState, Task, TaskId, TaskValidationError};
pub use model::user::User;
pub use notify::{
    ConfirmationSink, NotificationRequest, Notifier, NotifyError,
    PermissionStatus, Platform, PlatformProfile,
};
pub use repo::gateway::{PersistenceGateway, TASKS_SLOT, USER_SLOT};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use service::reminder::{resolve_trigger_instant, ReminderScheduler, ScheduleOutcome};
pub use service::session::SessionHolder;
pub use service::task_service::{TaskDraft, TaskService, TaskServiceError, TaskServiceResult};
pub use service::task_store::TaskStore;
pub use view::relative::relative_label;
pub use view::search::{filter_tasks, group_by_status, search_sections, StatusSection};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
