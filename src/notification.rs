// 🔔 Transient notifications
// Fire-and-forget: each one expires after its TTL, there is no cancel

use crate::error::RedistributionError;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
}

impl NotificationKind {
    pub fn color_token(&self) -> &'static str {
        match self {
            NotificationKind::Success => "green",
            NotificationKind::Error => "red",
            NotificationKind::Warning => "yellow",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    shown_at: Instant,
    ttl: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>, ttl: Duration) -> Self {
        Notification {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
            ttl,
        }
    }

    pub fn success(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NotificationKind::Success, message, ttl)
    }

    pub fn from_error(err: &RedistributionError, ttl: Duration) -> Self {
        let kind = if err.is_missing_record() {
            NotificationKind::Error
        } else {
            NotificationKind::Warning
        };
        Self::new(kind, err.to_string(), ttl)
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.ttl
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
