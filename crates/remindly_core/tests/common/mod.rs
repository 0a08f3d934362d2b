#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use remindly_core::{
    AppDeps, ConfirmationSink, FixedClock, KeyValueStore, MemoryKeyValueStore,
    NotificationRequest, Notifier, NotifyError, PermissionStatus, Platform, PlatformProfile,
    ReminderApp, StorageError, StorageResult,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn fixed(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    utc(y, m, d, h, min, 0).fixed_offset()
}

/// Central European zone for 2024 with only the spring transition:
/// +01:00 until 2024-03-31 01:00 UTC, +02:00 afterwards. Local 02:00..03:00
/// on that day does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpringForward;

impl SpringForward {
    const WINTER_SECS: i32 = 3600;
    const SUMMER_SECS: i32 = 2 * 3600;

    fn switch_utc() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap()
    }

    fn offset(secs: i32) -> FixedOffset {
        FixedOffset::east_opt(secs).unwrap()
    }

    pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<SpringForward> {
        SpringForward.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }
}

impl TimeZone for SpringForward {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        SpringForward
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let gap_start = Self::switch_utc() + chrono::Duration::seconds(Self::WINTER_SECS.into());
        let gap_end = Self::switch_utc() + chrono::Duration::seconds(Self::SUMMER_SECS.into());
        if *local < gap_start {
            LocalResult::Single(Self::offset(Self::WINTER_SECS))
        } else if *local >= gap_end {
            LocalResult::Single(Self::offset(Self::SUMMER_SECS))
        } else {
            LocalResult::None
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < Self::switch_utc() {
            Self::offset(Self::WINTER_SECS)
        } else {
            Self::offset(Self::SUMMER_SECS)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    Schedule(NotificationRequest),
    Cancel(String),
}

/// Notifier double recording every call in order.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<NotifierCall>>,
    next_id: AtomicUsize,
    pub fail_schedule: AtomicBool,
    pub fail_cancel: AtomicBool,
    pub permission: Mutex<Option<PermissionStatus>>,
    pub permission_after_request: Mutex<Option<PermissionStatus>>,
}

impl RecordingNotifier {
    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn scheduled(&self) -> Vec<NotificationRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NotifierCall::Schedule(request) => Some(request),
                NotifierCall::Cancel(_) => None,
            })
            .collect()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NotifierCall::Cancel(handle) => Some(handle),
                NotifierCall::Schedule(_) => None,
            })
            .collect()
    }

    /// Handles issued and not yet cancelled.
    pub fn live_handles(&self) -> BTreeSet<String> {
        let mut live = BTreeSet::new();
        let mut issued = 0;
        for call in self.calls() {
            match call {
                NotifierCall::Schedule(_) => {
                    issued += 1;
                    live.insert(format!("notif-{issued}"));
                }
                NotifierCall::Cancel(handle) => {
                    live.remove(&handle);
                }
            }
        }
        live
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn schedule(&self, request: &NotificationRequest) -> Result<String, NotifyError> {
        if self.fail_schedule.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected("permission denied".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(NotifierCall::Schedule(request.clone()));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("notif-{id}"))
    }

    async fn cancel(&self, handle: &str) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push(NotifierCall::Cancel(handle.to_string()));
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(NotifyError::Unavailable("bridge detached".to_string()));
        }
        Ok(())
    }

    async fn permission_status(&self) -> Result<PermissionStatus, NotifyError> {
        self.permission
            .lock()
            .unwrap()
            .ok_or_else(|| NotifyError::Unavailable("no permission api".to_string()))
    }

    async fn request_permission(&self) -> Result<PermissionStatus, NotifyError> {
        self.permission_after_request
            .lock()
            .unwrap()
            .ok_or_else(|| NotifyError::Unavailable("no permission api".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingConfirmations {
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingConfirmations {
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationSink for RecordingConfirmations {
    async fn confirm(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// Memory storage with switchable read/write failures.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryKeyValueStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    write_budget: Mutex<Option<usize>>,
}

impl FlakyStore {
    /// Lets the next `writes` set/remove calls succeed, then fails the rest.
    pub fn fail_writes_after(&self, writes: usize) {
        *self.write_budget.lock().unwrap() = Some(writes);
    }

    pub fn heal(&self) {
        self.fail_writes.store(false, Ordering::SeqCst);
        *self.write_budget.lock().unwrap() = None;
    }

    fn check(&self, flag: &AtomicBool) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("disk unavailable".to_string()));
        }
        Ok(())
    }

    fn spend_write(&self) -> StorageResult<()> {
        self.check(&self.fail_writes)?;
        match self.write_budget.lock().unwrap().as_mut() {
            Some(0) => Err(StorageError::Backend("disk full".to_string())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check(&self.fail_reads)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.spend_write()?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.spend_write()?;
        self.inner.remove(key).await
    }
}

/// Collaborators for one app instance, kept so tests can inspect them.
pub struct Harness {
    pub storage: Arc<FlakyStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub confirmations: Arc<RecordingConfirmations>,
    pub platform: PlatformProfile,
    pub now: DateTime<FixedOffset>,
}

impl Harness {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            storage: Arc::new(FlakyStore::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            confirmations: Arc::new(RecordingConfirmations::default()),
            platform: PlatformProfile::new(Platform::Android, true),
            now,
        }
    }

    pub fn ios_simulator(mut self) -> Self {
        self.platform = PlatformProfile::new(Platform::Ios, false);
        self
    }

    pub fn deps(&self) -> AppDeps {
        AppDeps {
            storage: self.storage.clone(),
            notifier: self.notifier.clone(),
            confirmations: self.confirmations.clone(),
            clock: Arc::new(FixedClock(self.now)),
            platform: self.platform,
        }
    }

    pub async fn open(&self) -> ReminderApp {
        ReminderApp::open(self.deps()).await.unwrap()
    }

    pub async fn raw_slot(&self, key: &str) -> Option<String> {
        self.storage.inner.get(key).await.unwrap()
    }
}
