use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::repository::NotificationRepository;
use crate::session::Session;

/// Clears notifications whenever the signed-in user goes away
pub struct AuthWatcher {
    session: Session,
    notifications: Arc<NotificationRepository>,
}

impl AuthWatcher {
    pub fn new(session: Session, notifications: Arc<NotificationRepository>) -> Self {
        Self {
            session,
            notifications,
        }
    }

    /// Spawns the watcher; it ends once every clone of the session is dropped
    pub fn start(self) -> JoinHandle<()> {
        let mut receiver = self.session.subscribe();
        let notifications = self.notifications;

        tokio::spawn(async move {
            let mut previous = receiver.borrow_and_update().clone();

            while receiver.changed().await.is_ok() {
                let current = receiver.borrow_and_update().clone();
                // A switch between users counts as signing out of the first
                if previous.is_some() && current != previous {
                    notifications.clear();
                    info!("Session ended, notifications cleared");
                }
                previous = current;
            }

            debug!("Auth watcher ended");
        })
    }
}
