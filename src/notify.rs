//! Would-be user notifications.
//!
//! Nothing is delivered to the operating system. Notifications are logged and
//! the most recent ones are kept in memory so the dashboard can list them.

use chrono::Local;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;

use crate::data::history::HistoryBuffer;

/// Who raised a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSource {
    /// Posted by a client through the API.
    Api,
    /// Raised by the background watcher.
    Watcher,
}

/// A notification that would have been shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Local time the notification was raised (`HH:MM:SS`).
    pub timestamp: String,
    pub title: String,
    pub message: String,
    pub source: NotificationSource,
}

/// Logs notifications and remembers the latest few.
#[derive(Debug)]
pub struct Notifier {
    recent: Mutex<HistoryBuffer<Notification>>,
}

impl Notifier {
    /// Create a notifier keeping at most `capacity` notifications.
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: Mutex::new(HistoryBuffer::bounded(capacity)),
        }
    }

    /// Log a notification and record it.
    pub fn send(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        source: NotificationSource,
    ) -> Notification {
        let notification = Notification {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            title: title.into(),
            message: message.into(),
            source,
        };

        warn!(
            title = %notification.title,
            source = ?notification.source,
            "NOTIFICATION: {}",
            notification.message
        );

        self.recent.lock().push(notification.clone());
        notification
    }

    /// Recorded notifications, oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        self.recent.lock().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_records_notification() {
        let notifier = Notifier::new(10);
        let sent = notifier.send("Break", "Look away for 20 seconds", NotificationSource::Api);

        let recent = notifier.recent();
        assert_eq!(recent, vec![sent]);
        assert_eq!(recent[0].title, "Break");
        assert_eq!(recent[0].source, NotificationSource::Api);
    }

    #[test]
    fn log_is_bounded() {
        let notifier = Notifier::new(2);
        for i in 0..5 {
            notifier.send(format!("t{}", i), "m", NotificationSource::Watcher);
        }

        let titles: Vec<_> = notifier.recent().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["t3", "t4"]);
    }
}
