mod common;

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};
use common::{
    fixed, utc, NotifierCall, RecordingConfirmations, RecordingNotifier, SpringForward,
};
use remindly_core::{
    resolve_trigger_instant, FixedClock, PermissionStatus, Platform, PlatformProfile,
    ReminderScheduler, ReminderState, ScheduleOutcome, Task,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

struct Fixture {
    notifier: Arc<RecordingNotifier>,
    confirmations: Arc<RecordingConfirmations>,
    scheduler: ReminderScheduler,
}

fn fixture(platform: PlatformProfile) -> Fixture {
    let notifier = Arc::new(RecordingNotifier::default());
    let confirmations = Arc::new(RecordingConfirmations::default());
    let scheduler = ReminderScheduler::new(
        notifier.clone(),
        confirmations.clone(),
        Arc::new(FixedClock(fixed(2024, 1, 1, 8, 0))),
        platform,
    );
    Fixture {
        notifier,
        confirmations,
        scheduler,
    }
}

fn device() -> Fixture {
    fixture(PlatformProfile::new(Platform::Android, true))
}

fn task_due(title: &str, hour: u32, minute: u32) -> Task {
    let mut task = Task::new(title);
    task.due_time = Some(utc(2023, 6, 15, hour, minute, 0));
    task
}

#[test]
fn resolves_documented_examples() {
    let now = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, 10, 0, 0)
        .unwrap();

    let later = resolve_trigger_instant(NaiveTime::from_hms_opt(14, 30, 0).unwrap(), &now);
    assert_eq!(later, fixed(2024, 1, 1, 14, 30));

    let earlier = resolve_trigger_instant(NaiveTime::from_hms_opt(8, 0, 0).unwrap(), &now);
    assert_eq!(earlier, fixed(2024, 1, 2, 8, 0));
}

#[test]
fn resolve_trigger_uses_time_of_day_of_due_instant_only() {
    let fixture = device();

    // Due time recorded on an unrelated date; only 09:00 matters.
    let trigger = fixture.scheduler.resolve_trigger(utc(2020, 5, 5, 9, 0, 42));
    assert_eq!(trigger, fixed(2024, 1, 1, 9, 0));
}

#[test]
fn resolve_trigger_reads_time_of_day_in_clock_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = offset.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let scheduler = ReminderScheduler::new(
        Arc::new(RecordingNotifier::default()),
        Arc::new(RecordingConfirmations::default()),
        Arc::new(FixedClock(now)),
        PlatformProfile::new(Platform::Android, true),
    );

    // 07:30 UTC is 09:30 at +02:00.
    let trigger = scheduler.resolve_trigger(utc(2024, 1, 1, 7, 30, 0));
    assert_eq!(
        trigger.naive_local(),
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    );
}

#[test]
fn next_day_rollover_keeps_wall_clock_across_dst() {
    let now = SpringForward::at(2024, 3, 30, 10, 0);
    let picked = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

    let trigger = resolve_trigger_instant(picked, &now);

    assert_eq!(trigger, SpringForward::at(2024, 3, 31, 8, 0));
    assert_eq!(trigger.with_timezone(&chrono::Utc), utc(2024, 3, 31, 6, 0, 0));
}

#[test]
fn picked_time_inside_dst_gap_moves_forward_one_hour() {
    let now = SpringForward::at(2024, 3, 30, 23, 0);
    let picked = NaiveTime::from_hms_opt(2, 30, 0).unwrap();

    let trigger = resolve_trigger_instant(picked, &now);

    assert_eq!(trigger, SpringForward::at(2024, 3, 31, 3, 30));
}

#[test]
fn scheduler_resolves_in_clock_zone_across_dst() {
    let scheduler = ReminderScheduler::new(
        Arc::new(RecordingNotifier::default()),
        Arc::new(RecordingConfirmations::default()),
        Arc::new(FixedClock(SpringForward::at(2024, 3, 30, 10, 0))),
        PlatformProfile::new(Platform::Android, true),
    );

    // Picked in winter time: 07:00 UTC reads 08:00 locally.
    let trigger = scheduler.resolve_trigger(utc(2024, 3, 20, 7, 0, 0));

    assert_eq!(
        trigger.naive_local(),
        NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    );
    assert_eq!(trigger.offset().local_minus_utc(), 2 * 3600);
}

#[tokio::test]
async fn schedule_requests_one_shot_notification() {
    let fixture = device();
    let task = task_due("Buy milk", 9, 0);

    let outcome = fixture.scheduler.schedule(&task).await.unwrap();

    assert_eq!(
        outcome,
        ScheduleOutcome::Scheduled {
            handle: "notif-1".to_string(),
            trigger_at: fixed(2024, 1, 1, 9, 0),
        }
    );
    let requests = fixture.notifier.scheduled();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].title, "Task Reminder: Buy milk");
    assert_eq!(requests[0].body, "Buy milk");
    assert_eq!(requests[0].trigger_at, fixed(2024, 1, 1, 9, 0));
    assert!(fixture.confirmations.shown().is_empty());
}

#[tokio::test]
async fn schedule_without_due_time_does_nothing() {
    let fixture = device();

    assert_eq!(fixture.scheduler.schedule(&Task::new("no due")).await, None);
    assert!(fixture.notifier.calls().is_empty());
}

#[tokio::test]
async fn ios_simulator_shows_confirmation_instead_of_scheduling() {
    let fixture = fixture(PlatformProfile::new(Platform::Ios, false));
    let mut task = task_due("Buy milk", 7, 15);

    let outcome = fixture.scheduler.reconcile(None, &mut task).await.unwrap();

    assert_eq!(
        outcome,
        ScheduleOutcome::Confirmed {
            trigger_at: fixed(2024, 1, 2, 7, 15),
        }
    );
    assert_eq!(task.notification_id, None);
    assert!(fixture.notifier.calls().is_empty());
    assert_eq!(
        fixture.confirmations.shown(),
        vec![(
            "Debug".to_string(),
            "Notification scheduled for 07:15".to_string()
        )]
    );
}

#[tokio::test]
async fn ios_device_uses_real_notifications() {
    let fixture = fixture(PlatformProfile::new(Platform::Ios, true));
    let mut task = task_due("Buy milk", 9, 0);

    fixture.scheduler.reconcile(None, &mut task).await;

    assert_eq!(task.notification_id.as_deref(), Some("notif-1"));
    assert!(fixture.confirmations.shown().is_empty());
}

#[tokio::test]
async fn schedule_failure_is_absorbed() {
    let fixture = device();
    fixture.notifier.fail_schedule.store(true, Ordering::SeqCst);
    let mut task = task_due("Buy milk", 9, 0);

    let outcome = fixture.scheduler.reconcile(None, &mut task).await.unwrap();

    assert_eq!(
        outcome,
        ScheduleOutcome::Failed {
            trigger_at: fixed(2024, 1, 1, 9, 0),
        }
    );
    assert_eq!(task.reminder_state(), ReminderState::None);
}

#[tokio::test]
async fn reconcile_cancels_previous_handle_before_scheduling() {
    let fixture = device();
    let mut task = task_due("Buy milk", 9, 0);
    fixture.scheduler.reconcile(None, &mut task).await;
    let first_handle = task.notification_id.clone().unwrap();

    task.due_time = Some(utc(2024, 1, 1, 10, 30, 0));
    let previous = task.notification_id.clone();
    fixture
        .scheduler
        .reconcile(previous.as_deref(), &mut task)
        .await;

    let calls = fixture.notifier.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[0], NotifierCall::Schedule(_)));
    assert_eq!(calls[1], NotifierCall::Cancel(first_handle));
    assert!(matches!(&calls[2], NotifierCall::Schedule(request) if request.trigger_at == fixed(2024, 1, 1, 10, 30)));
    assert_eq!(task.notification_id.as_deref(), Some("notif-2"));
    assert_eq!(fixture.notifier.live_handles().len(), 1);
}

#[tokio::test]
async fn reconcile_without_due_time_cancels_and_clears() {
    let fixture = device();
    let mut task = task_due("Buy milk", 9, 0);
    fixture.scheduler.reconcile(None, &mut task).await;

    task.due_time = None;
    let previous = task.notification_id.clone();
    let outcome = fixture
        .scheduler
        .reconcile(previous.as_deref(), &mut task)
        .await;

    assert_eq!(outcome, None);
    assert_eq!(task.notification_id, None);
    assert!(fixture.notifier.live_handles().is_empty());
}

#[tokio::test]
async fn cancel_failure_does_not_block_reschedule() {
    let fixture = device();
    fixture.notifier.fail_cancel.store(true, Ordering::SeqCst);
    let mut task = task_due("Buy milk", 9, 0);

    fixture
        .scheduler
        .reconcile(Some("stale-handle"), &mut task)
        .await;

    assert_eq!(
        fixture.notifier.cancelled(),
        vec!["stale-handle".to_string()]
    );
    assert_eq!(task.notification_id.as_deref(), Some("notif-1"));
}

#[tokio::test]
async fn ensure_permission_requests_only_when_undetermined() {
    let fixture = device();
    *fixture.notifier.permission.lock().unwrap() = Some(PermissionStatus::Undetermined);
    *fixture.notifier.permission_after_request.lock().unwrap() = Some(PermissionStatus::Granted);
    assert_eq!(
        fixture.scheduler.ensure_permission().await,
        PermissionStatus::Granted
    );

    *fixture.notifier.permission.lock().unwrap() = Some(PermissionStatus::Denied);
    assert_eq!(
        fixture.scheduler.ensure_permission().await,
        PermissionStatus::Denied
    );
}

#[tokio::test]
async fn ensure_permission_maps_host_failure_to_denied() {
    let fixture = device();

    assert_eq!(
        fixture.scheduler.ensure_permission().await,
        PermissionStatus::Denied
    );
}
