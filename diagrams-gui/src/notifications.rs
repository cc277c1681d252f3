use std::time::{Duration, Instant};

pub(crate) const NOTIFICATION_TTL: Duration = Duration::from_millis(2800);

#[derive(Debug, Clone)]
pub(crate) struct Notification {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) created_at: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct NotificationHandler {
    notifications: Vec<Notification>,
}

impl NotificationHandler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn show_info(&mut self, title: &str, message: &str) {
        self.notifications.push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            created_at: Instant::now(),
        });
    }

    /// Newest first, at most four.
    pub(crate) fn recent(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().rev().take(4)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub(crate) fn cleanup_old_notifications(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.created_at) < NOTIFICATION_TTL);
    }
}
