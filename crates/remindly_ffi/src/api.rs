//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task, session and reminder use-cases to Dart via FRB.
//! - Adapt Dart callbacks to the core notification and confirmation seams.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Action failures come back as envelopes with `ok=false`, never as throws.
//! - One `AppHandle` owns all task state; calls on it are serialized.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use flutter_rust_bridge::DartFnFuture;
use log::{debug, warn};
use remindly_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    relative_label, search_sections, AppDeps, ConfirmationSink, CoreConfig, NotificationHandle,
    NotificationRequest, Notifier, NotifyError, PermissionStatus, Platform, PlatformProfile,
    ReminderApp, SqliteKeyValueStore, SystemClock, Task, TaskDraft, TaskId, TaskStatus, User,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

type ScheduleCallback = Box<dyn Fn(String, String, i64) -> DartFnFuture<String> + Send + Sync>;
type CancelCallback = Box<dyn Fn(String) -> DartFnFuture<()> + Send + Sync>;
type PermissionCallback = Box<dyn Fn(bool) -> DartFnFuture<String> + Send + Sync>;
type ConfirmCallback = Box<dyn Fn(String, String) -> DartFnFuture<()> + Send + Sync>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Repeating the same `level + log_dir` is a no-op; different values fail.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Running app instance owned by the Dart side.
#[flutter_rust_bridge::frb(opaque)]
pub struct AppHandle {
    inner: Mutex<ReminderApp>,
}

/// Task projection for list and form screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    /// Stable status tag (`TODO|IN_PROGRESS|DONE`).
    pub status: String,
    pub status_color: String,
    pub due_time_ms: Option<i64>,
    pub notification_id: Option<String>,
    /// Relative label of the next reminder, e.g. `in 3 hours`.
    pub reminder_label: Option<String>,
}

/// Status section for the grouped list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSectionItem {
    pub status: String,
    pub status_color: String,
    pub tasks: Vec<TaskItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub name: String,
    pub onboarded: bool,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Task action envelope; `task` is set when the action produced a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    pub task: Option<TaskItem>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task: TaskItem) -> Self {
        Self {
            ok: true,
            task: Some(task),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task: None,
            message: message.into(),
        }
    }
}

struct DartNotifier {
    schedule: ScheduleCallback,
    cancel: CancelCallback,
    permission: PermissionCallback,
}

#[async_trait]
impl Notifier for DartNotifier {
    async fn schedule(
        &self,
        request: &NotificationRequest,
    ) -> Result<NotificationHandle, NotifyError> {
        let handle = (self.schedule)(
            request.title.clone(),
            request.body.clone(),
            request.trigger_at.timestamp_millis(),
        )
        .await;
        if handle.trim().is_empty() {
            return Err(NotifyError::Rejected(
                "host returned no notification id".to_string(),
            ));
        }
        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> Result<(), NotifyError> {
        (self.cancel)(handle.to_string()).await;
        Ok(())
    }

    async fn permission_status(&self) -> Result<PermissionStatus, NotifyError> {
        parse_permission(&(self.permission)(false).await)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, NotifyError> {
        parse_permission(&(self.permission)(true).await)
    }
}

struct DartConfirmations {
    confirm: ConfirmCallback,
}

#[async_trait]
impl ConfirmationSink for DartConfirmations {
    async fn confirm(&self, title: &str, message: &str) {
        (self.confirm)(title.to_string(), message.to_string()).await;
    }
}

/// Opens the app against SQLite storage and Dart-side notifications.
///
/// Input semantics:
/// - `db_path`: SQLite file; blank falls back to `REMINDLY_DB_PATH` or the
///   temp directory.
/// - `platform`: host OS name (`ios|android|macos|...`), unknown values
///   are accepted.
/// - `schedule(title, body, trigger_epoch_ms)` returns the notification id,
///   or an empty string when the host could not schedule.
/// - `permission(request)` returns `granted|denied|undetermined`.
///
/// # FFI contract
/// - Async call; reads the persisted user and tasks once.
/// - Returns an error message when storage cannot be opened.
pub async fn app_open(
    db_path: String,
    platform: String,
    is_physical_device: bool,
    schedule: impl Fn(String, String, i64) -> DartFnFuture<String> + Send + Sync + 'static,
    cancel: impl Fn(String) -> DartFnFuture<()> + Send + Sync + 'static,
    permission: impl Fn(bool) -> DartFnFuture<String> + Send + Sync + 'static,
    confirm: impl Fn(String, String) -> DartFnFuture<()> + Send + Sync + 'static,
) -> Result<AppHandle, String> {
    let db_path = resolve_db_path(&db_path);
    let storage = SqliteKeyValueStore::open(&db_path)
        .map_err(|err| format!("app_open failed: {err}"))?;
    let platform = platform.parse().unwrap_or(Platform::Other);

    let deps = AppDeps {
        storage: Arc::new(storage),
        notifier: Arc::new(DartNotifier {
            schedule: Box::new(schedule),
            cancel: Box::new(cancel),
            permission: Box::new(permission),
        }),
        confirmations: Arc::new(DartConfirmations {
            confirm: Box::new(confirm),
        }),
        clock: Arc::new(SystemClock),
        platform: PlatformProfile::new(platform, is_physical_device),
    };
    let app = ReminderApp::open(deps)
        .await
        .map_err(|err| format!("app_open failed: {err}"))?;
    Ok(AppHandle {
        inner: Mutex::new(app),
    })
}

/// Current user and onboarding signal.
pub async fn app_user(handle: &AppHandle) -> UserResponse {
    let app = handle.inner.lock().await;
    UserResponse {
        name: app.session().user().name.clone(),
        onboarded: app.session().is_onboarded(),
    }
}

/// Saves the onboarding name.
pub async fn app_set_user(handle: &AppHandle, name: String) -> ActionResponse {
    let name = name.trim().to_string();
    if name.is_empty() {
        return ActionResponse::failure("app_set_user failed: name cannot be empty");
    }
    let mut app = handle.inner.lock().await;
    match app.session_mut().set_user(User::new(name)).await {
        Ok(()) => ActionResponse::success("User saved."),
        Err(err) => ActionResponse::failure(format!("app_set_user failed: {err}")),
    }
}

/// All tasks in insertion order.
pub async fn app_list_tasks(handle: &AppHandle) -> Vec<TaskItem> {
    let app = handle.inner.lock().await;
    app.tasks()
        .list()
        .iter()
        .map(|task| to_task_item(&app, task))
        .collect()
}

/// Tasks matching `query`, grouped by status in `TODO, IN_PROGRESS, DONE`
/// order. Empty sections are included.
pub async fn app_search_sections(handle: &AppHandle, query: String) -> Vec<TaskSectionItem> {
    let app = handle.inner.lock().await;
    search_sections(&app.tasks().list(), &query)
        .into_iter()
        .map(|section| TaskSectionItem {
            status: section.status.as_str().to_string(),
            status_color: section.status.color_hex().to_string(),
            tasks: section
                .tasks
                .iter()
                .map(|task| to_task_item(&app, task))
                .collect(),
        })
        .collect()
}

/// Creates a task and schedules its reminder when `due_time_ms` is set.
///
/// `status` accepts a status tag; blank means `TODO`.
pub async fn app_create_task(
    handle: &AppHandle,
    title: String,
    status: String,
    due_time_ms: Option<i64>,
) -> TaskActionResponse {
    let draft = match build_draft(title, &status, due_time_ms) {
        Ok(draft) => draft,
        Err(message) => {
            return TaskActionResponse::failure(format!("app_create_task failed: {message}"));
        }
    };
    let mut app = handle.inner.lock().await;
    match app.tasks_mut().create_task(draft).await {
        Ok(task) => TaskActionResponse::success("Task created.", to_task_item(&app, &task)),
        Err(err) => TaskActionResponse::failure(format!("app_create_task failed: {err}")),
    }
}

/// Replaces title, status and due time; the reminder is rescheduled.
pub async fn app_edit_task(
    handle: &AppHandle,
    id: String,
    title: String,
    status: String,
    due_time_ms: Option<i64>,
) -> TaskActionResponse {
    let parsed = parse_task_id(&id)
        .and_then(|id| Ok((id, build_draft(title, &status, due_time_ms)?)));
    let (id, draft) = match parsed {
        Ok(parsed) => parsed,
        Err(message) => {
            return TaskActionResponse::failure(format!("app_edit_task failed: {message}"));
        }
    };
    let mut app = handle.inner.lock().await;
    match app.tasks_mut().edit_task(id, draft).await {
        Ok(Some(task)) => {
            TaskActionResponse::success("Task updated.", to_task_item(&app, &task))
        }
        Ok(None) => TaskActionResponse::failure("app_edit_task failed: task not found"),
        Err(err) => TaskActionResponse::failure(format!("app_edit_task failed: {err}")),
    }
}

/// Advances the task one step through `TODO -> IN_PROGRESS -> DONE -> TODO`.
pub async fn app_cycle_status(handle: &AppHandle, id: String) -> TaskActionResponse {
    let id = match parse_task_id(&id) {
        Ok(id) => id,
        Err(message) => {
            return TaskActionResponse::failure(format!("app_cycle_status failed: {message}"));
        }
    };
    let mut app = handle.inner.lock().await;
    match app.tasks_mut().cycle_status(id).await {
        Ok(Some(task)) => {
            TaskActionResponse::success("Status updated.", to_task_item(&app, &task))
        }
        Ok(None) => TaskActionResponse::failure("app_cycle_status failed: task not found"),
        Err(err) => TaskActionResponse::failure(format!("app_cycle_status failed: {err}")),
    }
}

/// Sets the task to `DONE`.
pub async fn app_mark_done(handle: &AppHandle, id: String) -> TaskActionResponse {
    let id = match parse_task_id(&id) {
        Ok(id) => id,
        Err(message) => {
            return TaskActionResponse::failure(format!("app_mark_done failed: {message}"));
        }
    };
    let mut app = handle.inner.lock().await;
    match app.tasks_mut().mark_done(id).await {
        Ok(Some(task)) => {
            TaskActionResponse::success("Task completed.", to_task_item(&app, &task))
        }
        Ok(None) => TaskActionResponse::failure("app_mark_done failed: task not found"),
        Err(err) => TaskActionResponse::failure(format!("app_mark_done failed: {err}")),
    }
}

/// Cancels the task's reminder and deletes it. Unknown ids succeed.
pub async fn app_delete_task(handle: &AppHandle, id: String) -> ActionResponse {
    let id = match parse_task_id(&id) {
        Ok(id) => id,
        Err(message) => {
            return ActionResponse::failure(format!("app_delete_task failed: {message}"));
        }
    };
    let mut app = handle.inner.lock().await;
    match app.tasks_mut().delete_task(id).await {
        Ok(true) => ActionResponse::success("Task deleted."),
        Ok(false) => ActionResponse::success("Task already deleted."),
        Err(err) => ActionResponse::failure(format!("app_delete_task failed: {err}")),
    }
}

/// Cancels reminders and erases the user and all tasks.
pub async fn app_logout(handle: &AppHandle) -> ActionResponse {
    let mut app = handle.inner.lock().await;
    match app.logout().await {
        Ok(()) => ActionResponse::success("Logged out."),
        Err(err) => ActionResponse::failure(format!("app_logout failed: {err}")),
    }
}

/// Startup permission check; returns `granted|denied|undetermined`.
pub async fn app_ensure_permission(handle: &AppHandle) -> String {
    let app = handle.inner.lock().await;
    permission_label(app.ensure_notification_permission().await).to_string()
}

fn resolve_db_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CoreConfig::from_env().db_path;
    }
    PathBuf::from(trimmed)
}

fn build_draft(
    title: String,
    status: &str,
    due_time_ms: Option<i64>,
) -> Result<TaskDraft, String> {
    let mut draft = TaskDraft::new(title);
    let status = status.trim();
    if !status.is_empty() {
        let status = status
            .parse::<TaskStatus>()
            .map_err(|err| err.to_string())?;
        draft = draft.with_status(status);
    }
    if let Some(ms) = due_time_ms {
        draft = draft.with_due_time(epoch_ms_to_utc(ms)?);
    }
    Ok(draft)
}

fn epoch_ms_to_utc(ms: i64) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| format!("due time out of range: {ms}"))
}

fn parse_task_id(raw: &str) -> Result<TaskId, String> {
    TaskId::parse_str(raw.trim()).map_err(|_| format!("invalid task id: {raw}"))
}

fn to_task_item(app: &ReminderApp, task: &Task) -> TaskItem {
    let scheduler = app.tasks().scheduler();
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        status: task.status.as_str().to_string(),
        status_color: task.status.color_hex().to_string(),
        due_time_ms: task.due_time.map(|due| due.timestamp_millis()),
        notification_id: task.notification_id.clone(),
        reminder_label: task
            .due_time
            .map(|due| relative_label(&scheduler.now(), &scheduler.resolve_trigger(due))),
    }
}

fn parse_permission(raw: &str) -> Result<PermissionStatus, NotifyError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "granted" => Ok(PermissionStatus::Granted),
        "denied" => Ok(PermissionStatus::Denied),
        "undetermined" => Ok(PermissionStatus::Undetermined),
        other => {
            warn!("event=permission_status module=ffi status=error value={other}");
            Err(NotifyError::Unavailable(format!(
                "unknown permission status: {other}"
            )))
        }
    }
}

fn permission_label(status: PermissionStatus) -> &'static str {
    debug!("event=permission_status module=ffi status=ok value={status:?}");
    match status {
        PermissionStatus::Granted => "granted",
        PermissionStatus::Denied => "denied",
        PermissionStatus::Undetermined => "undetermined",
    }
}
