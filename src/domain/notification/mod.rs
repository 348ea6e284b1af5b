//! User-facing notifications (toasts, CLI messages)

mod notifier;

pub use notifier::{Notification, NotificationLevel, Notifier};

#[cfg(test)]
pub use notifier::MockNotifier;
