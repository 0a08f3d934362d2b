//! Reminder scheduling for tasks with a due time.
//!
//! # Responsibility
//! - Resolve a picked time of day into the next concrete trigger instant.
//! - Keep at most one live platform notification per task.
//! - Substitute a visible confirmation on hosts without reliable local
//!   notifications (iOS simulator).
//!
//! # Invariants
//! - A previous handle is always cancelled before a replacement is requested.
//! - Notification failures are logged and absorbed; they never fail a task
//!   mutation.
//! - Trigger instants are strictly after `now` and carry second = 0.

use crate::clock::Clock;
use crate::model::task::{NotificationHandle, Task};
use crate::notify::{
    ConfirmationSink, NotificationRequest, Notifier, PermissionStatus, PlatformProfile,
};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

const REMINDER_TITLE_PREFIX: &str = "Task Reminder: ";
const CONFIRMATION_TITLE: &str = "Debug";

/// Resolves `picked_time` to its next occurrence relative to `now`.
///
/// Today's calendar date (in `now`'s zone) is combined with the hour and
/// minute of `picked_time`, seconds zeroed. When that instant is not after
/// `now`, the same wall-clock time on the following day is returned.
///
/// Local times skipped by a DST transition are moved forward by one hour;
/// ambiguous local times resolve to the earlier instant.
pub fn resolve_trigger_instant<Tz: TimeZone>(
    picked_time: NaiveTime,
    now: &DateTime<Tz>,
) -> DateTime<Tz> {
    let tz = now.timezone();
    let time = NaiveTime::from_hms_opt(picked_time.hour(), picked_time.minute(), 0)
        .unwrap_or(picked_time);
    let today = now.date_naive();

    let candidate = localize(&tz, today.and_time(time));
    if candidate > *now {
        return candidate;
    }

    let tomorrow = today.succ_opt().unwrap_or(today);
    localize(&tz, tomorrow.and_time(time))
}

fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// Result of one scheduling attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A platform notification is pending under `handle`.
    Scheduled {
        handle: NotificationHandle,
        trigger_at: DateTime<FixedOffset>,
    },
    /// A confirmation was shown instead of registering a notification.
    Confirmed { trigger_at: DateTime<FixedOffset> },
    /// The notifier failed; nothing is pending.
    Failed { trigger_at: DateTime<FixedOffset> },
}

impl ScheduleOutcome {
    pub fn trigger_at(&self) -> DateTime<FixedOffset> {
        match self {
            Self::Scheduled { trigger_at, .. }
            | Self::Confirmed { trigger_at }
            | Self::Failed { trigger_at } => *trigger_at,
        }
    }

    pub fn handle(&self) -> Option<&str> {
        match self {
            Self::Scheduled { handle, .. } => Some(handle.as_str()),
            Self::Confirmed { .. } | Self::Failed { .. } => None,
        }
    }
}

/// Owns the notification side of the task lifecycle.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    confirmations: Arc<dyn ConfirmationSink>,
    clock: Arc<dyn Clock>,
    platform: PlatformProfile,
}

impl ReminderScheduler {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        confirmations: Arc<dyn ConfirmationSink>,
        clock: Arc<dyn Clock>,
        platform: PlatformProfile,
    ) -> Self {
        Self {
            notifier,
            confirmations,
            clock,
            platform,
        }
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Trigger instant for a stored due time, using its local time of day.
    ///
    /// Both the time of day and the rollover are computed in the clock's
    /// zone, so a next-day trigger keeps its wall-clock time across DST.
    pub fn resolve_trigger(&self, due_time: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.clock.next_occurrence(self.clock.time_of_day(due_time))
    }

    /// Brings `task.notification_id` in line with `task.due_time`.
    ///
    /// Cancels `previous_handle` first when present, then schedules a new
    /// reminder if the task has a due time. The resulting handle (or `None`)
    /// is written to `task` before returning.
    pub async fn reconcile(
        &self,
        previous_handle: Option<&str>,
        task: &mut Task,
    ) -> Option<ScheduleOutcome> {
        if let Some(handle) = previous_handle {
            self.cancel(handle).await;
        }
        task.notification_id = None;

        let outcome = self.schedule(task).await?;
        task.notification_id = outcome.handle().map(str::to_string);
        Some(outcome)
    }

    /// Requests a reminder for `task`; `None` when it has no due time.
    ///
    /// Does not touch any existing handle on `task`.
    pub async fn schedule(&self, task: &Task) -> Option<ScheduleOutcome> {
        let due_time = task.due_time?;
        let trigger_at = self.resolve_trigger(due_time);

        if !self.platform.delivers_local_notifications() {
            let message = format!("Notification scheduled for {}", trigger_at.format("%H:%M"));
            self.confirmations
                .confirm(CONFIRMATION_TITLE, message.as_str())
                .await;
            info!(
                "event=reminder_schedule module=reminder status=confirmed task_id={} trigger_at={}",
                task.id,
                trigger_at.to_rfc3339()
            );
            return Some(ScheduleOutcome::Confirmed { trigger_at });
        }

        let request = NotificationRequest {
            title: format!("{REMINDER_TITLE_PREFIX}{}", task.title),
            body: task.title.clone(),
            trigger_at,
        };

        match self.notifier.schedule(&request).await {
            Ok(handle) if !handle.is_empty() => {
                info!(
                    "event=reminder_schedule module=reminder status=ok task_id={} trigger_at={}",
                    task.id,
                    trigger_at.to_rfc3339()
                );
                Some(ScheduleOutcome::Scheduled { handle, trigger_at })
            }
            Ok(_) => {
                warn!(
                    "event=reminder_schedule module=reminder status=error task_id={} error_code=empty_handle",
                    task.id
                );
                Some(ScheduleOutcome::Failed { trigger_at })
            }
            Err(err) => {
                warn!(
                    "event=reminder_schedule module=reminder status=error task_id={} error={}",
                    task.id, err
                );
                Some(ScheduleOutcome::Failed { trigger_at })
            }
        }
    }

    /// Best-effort cancellation; failures are logged and dropped.
    pub async fn cancel(&self, handle: &str) {
        match self.notifier.cancel(handle).await {
            Ok(()) => debug!("event=reminder_cancel module=reminder status=ok"),
            Err(err) => warn!(
                "event=reminder_cancel module=reminder status=error error={}",
                err
            ),
        }
    }

    /// Checks notification permission, asking the host when undecided.
    ///
    /// Host failures are reported as `Denied`.
    pub async fn ensure_permission(&self) -> PermissionStatus {
        let current = match self.notifier.permission_status().await {
            Ok(status) => status,
            Err(err) => {
                warn!(
                    "event=reminder_permission module=reminder status=error stage=query error={}",
                    err
                );
                return PermissionStatus::Denied;
            }
        };
        if current != PermissionStatus::Undetermined {
            return current;
        }

        match self.notifier.request_permission().await {
            Ok(status) => {
                info!(
                    "event=reminder_permission module=reminder status=ok result={:?}",
                    status
                );
                status
            }
            Err(err) => {
                warn!(
                    "event=reminder_permission module=reminder status=error stage=request error={}",
                    err
                );
                PermissionStatus::Denied
            }
        }
    }
}
