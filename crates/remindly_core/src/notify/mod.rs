//! Platform notification contracts.
//!
//! # Responsibility
//! - Define the async seam to the host notification subsystem.
//! - Define the user-visible confirmation seam used where real local
//!   notifications are unavailable.
//! - Describe the host platform so the scheduler can pick a delivery path.
//!
//! # Invariants
//! - Core never depends on a concrete platform notification API.
//! - Errors from these seams are absorbed by the scheduler, never by callers.

mod platform;

pub use platform::{Platform, PlatformProfile};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::task::NotificationHandle;

/// Failure reported by the notification subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The host refused the request (for example permission denied).
    Rejected(String),
    /// The host bridge is unavailable or returned an unusable response.
    Unavailable(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(message) => write!(f, "notification rejected: {message}"),
            Self::Unavailable(message) => write!(f, "notification subsystem unavailable: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// One-shot local notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub trigger_at: DateTime<FixedOffset>,
}

/// Host notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Host notification subsystem.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Schedules a one-shot notification and returns its handle.
    async fn schedule(&self, request: &NotificationRequest)
        -> Result<NotificationHandle, NotifyError>;

    /// Cancels a pending notification. Unknown handles are not an error.
    async fn cancel(&self, handle: &str) -> Result<(), NotifyError>;

    async fn permission_status(&self) -> Result<PermissionStatus, NotifyError> {
        Ok(PermissionStatus::Granted)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, NotifyError> {
        Ok(PermissionStatus::Granted)
    }
}

/// User-visible confirmation shown instead of registering a notification.
#[async_trait]
pub trait ConfirmationSink: Send + Sync {
    async fn confirm(&self, title: &str, message: &str);
}
