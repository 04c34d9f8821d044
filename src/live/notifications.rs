use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::events::PushEvent;
use super::handler::{LiveUpdateError, PushEventHandler};
use crate::models::NotificationKind;
use crate::repository::{NotificationRepository, UserRepository};

/// Turns push events into user-facing notifications
pub struct NotificationsLiveUpdater {
    notifications: Arc<NotificationRepository>,
    users: Arc<UserRepository>,
}

impl NotificationsLiveUpdater {
    pub fn new(notifications: Arc<NotificationRepository>, users: Arc<UserRepository>) -> Self {
        Self {
            notifications,
            users,
        }
    }
}

#[async_trait]
impl PushEventHandler for NotificationsLiveUpdater {
    async fn handle_push_event(&self, event: PushEvent) -> Result<(), LiveUpdateError> {
        // Users embedded in events go through the repository so the
        // notification points at the shared instance
        let kind = match event {
            PushEvent::TokenReceived(event) => NotificationKind::TokenReceived {
                amount: event.amount,
                from: event.user.map(|user| self.users.update(user, true)),
            },
            PushEvent::FriendshipReceived(event) => {
                let (request, user) = event.request.into_parts();
                NotificationKind::FriendRequestReceived {
                    request_id: request.id,
                    user: self.users.update(user, true),
                }
            }
            PushEvent::FriendshipAccepted(event) => {
                debug!(request_id = %event.request_id, "Friend request accepted remotely");
                NotificationKind::FriendRequestAccepted {
                    user: self.users.update(event.user, true),
                }
            }
        };

        self.notifications.push(kind);
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "NotificationsLiveUpdater"
    }
}
