use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::models::{Notification, NotificationKind};

/// Notifications built from push events, newest first
pub struct NotificationRepository {
    notifications: Mutex<Vec<Notification>>,
    // Not reset by `clear`, so ids stay unique for the lifetime of the client
    next_id: AtomicU64,
}

impl Default for NotificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationRepository {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn notifications(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a new unread notification under the next local id
    pub fn push(&self, kind: NotificationKind) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            kind,
            created_at: Utc::now(),
            read: false,
        };

        debug!(
            notification_id = notification.id,
            kind = notification.kind.kind_name(),
            "Notification added"
        );
        self.notifications().insert(0, notification.clone());
        notification
    }

    pub fn list(&self) -> Vec<Notification> {
        self.notifications().clone()
    }

    pub fn get(&self, id: u64) -> Option<Notification> {
        self.notifications().iter().find(|n| n.id == id).cloned()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications().iter().filter(|n| !n.read).count()
    }

    /// Returns false when no notification has this id
    pub fn mark_read(&self, id: u64) -> bool {
        match self.notifications().iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&self) {
        for notification in self.notifications().iter_mut() {
            notification.read = true;
        }
    }

    pub fn remove(&self, id: u64) -> bool {
        let mut notifications = self.notifications();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        notifications.len() != before
    }

    pub fn len(&self) -> usize {
        self.notifications().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications().is_empty()
    }

    pub fn clear(&self) {
        let mut notifications = self.notifications();
        debug!(cleared = notifications.len(), "Clearing notifications");
        notifications.clear();
    }
}
