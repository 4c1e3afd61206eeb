//! The global notification surface. The HTTP interceptors report problems
//! here as a side effect, in addition to failing the call.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{info, warn};

pub const NOTIFY_SESSION_EXPIRED: &str = "Your session has expired, please log in again";
pub const NOTIFY_NO_PERMISSION: &str = "You do not have permission to perform this operation";
pub const NOTIFY_REQUEST_FAILED: &str = "Request failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info<S: Into<String>>(message: S) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Delivery is best effort, implementations must not fail
pub trait Notifier: Debug + Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Collects notifications until the UI takes them
///
/// Clones share the same log
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything collected so far (oldest first)
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => info!(msg = %notification.message, "notification"),
            NotificationLevel::Error => warn!(msg = %notification.message, "notification"),
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_log() {
        let log = NotificationLog::new();
        let shared = log.clone();
        shared.notify(Notification::error(NOTIFY_REQUEST_FAILED));
        shared.notify(Notification::info("saved"));

        let actual = log.drain();

        assert_eq!(
            actual,
            vec![
                Notification::error(NOTIFY_REQUEST_FAILED),
                Notification::info("saved")
            ]
        );
        assert!(log.is_empty());
    }
}
