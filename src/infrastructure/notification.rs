//! Notifier implementations

use std::io::Write;

use tracing::{error, info};

use crate::domain::notification::{Notification, NotificationLevel, Notifier};

/// Writes notifications to stderr and mirrors them into the log
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    fn render(notification: &Notification) -> String {
        let label = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        format!("[{}] {}", label, notification.message)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => error!(message = %notification.message, "notification"),
            NotificationLevel::Success => info!(message = %notification.message, "notification"),
        }

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", Self::render(&notification));
    }
}
