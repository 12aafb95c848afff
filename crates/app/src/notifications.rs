//! Transient notifications shown to the user after an action.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Default)]
struct Queue {
    next_id: u64,
    pending: Vec<Notification>,
}

/// Shared queue of notifications. Clones refer to the same queue.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    queue: Arc<Mutex<Queue>>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification and return its id. Ids increase monotonically.
    pub fn push(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> NotificationId {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        queue.next_id += 1;

        let notification = Notification {
            id: NotificationId(queue.next_id),
            title: title.into(),
            description: description.into(),
            kind,
        };

        debug!(id = notification.id.0, %kind, title = %notification.title, "notification queued");

        let id = notification.id;
        queue.pending.push(notification);

        id
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) -> NotificationId {
        self.push(NotificationKind::Info, title, description)
    }

    pub fn success(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> NotificationId {
        self.push(NotificationKind::Success, title, description)
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) -> NotificationId {
        self.push(NotificationKind::Error, title, description)
    }

    /// Remove a notification. Returns whether it was still queued.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let before = queue.pending.len();

        queue.pending.retain(|notification| notification.id != id);

        queue.pending.len() != before
    }

    /// Currently queued notifications, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .clone()
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(
            &mut self
                .queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pending,
        )
    }
}
