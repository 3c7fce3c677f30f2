//! User-facing notification channel.
//!
//! Adapters report failures here and stores report confirmed mutations;
//! the host decides how a notification is shown.

use log::{info, warn};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);

    fn success(&self, message: &str) {
        self.notify(Severity::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message);
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => info!("event=notify module=notify severity=success message={message}"),
            Severity::Error => warn!("event=notify module=notify severity=error message={message}"),
        }
    }
}

/// Keeps every notification in memory, oldest first.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().clone()
    }

    /// Drains the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.entries.lock().push(Notification {
            severity,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{LogNotifier, Notifier, RecordingNotifier, Severity};

    #[test]
    fn recording_notifier_keeps_order_and_drains() {
        let notifier = RecordingNotifier::new();
        notifier.success("saved");
        notifier.error("failed");

        assert_eq!(notifier.count(Severity::Error), 1);
        let drained = notifier.take();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "saved");
        assert!(notifier.entries().is_empty());
    }

    #[test]
    fn log_notifier_accepts_both_severities_as_trait_object() {
        let notifier: &dyn Notifier = &LogNotifier;
        notifier.success("saved");
        notifier.error("failed");
        notifier.notify(Severity::Success, "direct");
    }
}
