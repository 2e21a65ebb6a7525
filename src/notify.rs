use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn saving() -> Self {
        Self {
            message: "Saving...".to_string(),
            kind: NotificationKind::Saving,
        }
    }
}

/// Single-slot notification display. There is no queue: a new notification
/// replaces the visible one and restarts the dismissal timer.
#[derive(Debug)]
pub struct Notifier {
    current: Option<(Notification, Instant)>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, notification: Notification, now: Instant) {
        match notification.kind {
            NotificationKind::Error => warn!("{}", notification.message),
            _ => info!("{}", notification.message),
        }
        self.current = Some((notification, now + self.ttl));
    }

    /// The notification still on screen at `now`, if any.
    pub fn visible(&self, now: Instant) -> Option<&Notification> {
        match &self.current {
            Some((n, until)) if now < *until => Some(n),
            _ => None,
        }
    }
}
