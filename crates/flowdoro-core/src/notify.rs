//! Notification delivery.
//!
//! The core decides *what* to tell the user; a [`NotificationSink`]
//! decides how to show it and when to dismiss it.

use std::time::Duration;

use serde::Serialize;

/// A transient message and how long it should stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
}

pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

impl<F: FnMut(Notification)> NotificationSink for F {
    fn notify(&mut self, notification: Notification) {
        self(notification)
    }
}

/// Sends notifications to the `tracing` log at info level.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: Notification) {
        tracing::info!(
            duration_secs = notification.duration.as_secs(),
            "{}",
            notification.message
        );
    }
}
