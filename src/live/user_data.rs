use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::events::PushEvent;
use super::handler::{LiveUpdateError, PushEventHandler};
use crate::repository::{FriendRequestRepository, UserRepository};
use crate::session::Session;

const TOKEN_BALANCE_ATTRIBUTES: [&str; 2] = ["id", "tokenBalance"];
const FRIENDS_ATTRIBUTES: [&str; 2] = ["id", "friends"];

fn attributes(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Keeps the signed-in user's data current by refetching what a push event
/// touched. Event payloads are never applied directly.
pub struct UserDataLiveUpdater {
    session: Session,
    users: Arc<UserRepository>,
    friend_requests: Arc<FriendRequestRepository>,
    request_user_attributes: Vec<String>,
}

impl UserDataLiveUpdater {
    pub fn new(
        session: Session,
        users: Arc<UserRepository>,
        friend_requests: Arc<FriendRequestRepository>,
        request_user_attributes: Vec<String>,
    ) -> Self {
        Self {
            session,
            users,
            friend_requests,
            request_user_attributes,
        }
    }
}

#[async_trait]
impl PushEventHandler for UserDataLiveUpdater {
    async fn handle_push_event(&self, event: PushEvent) -> Result<(), LiveUpdateError> {
        let user_id = self
            .session
            .current_user()
            .ok_or(LiveUpdateError::NotAuthenticated)?;
        let event_type = event.event_type();

        match event {
            PushEvent::TokenReceived(_) => {
                self.users
                    .load(&user_id, &attributes(&TOKEN_BALANCE_ATTRIBUTES))
                    .await?;
            }
            PushEvent::FriendshipReceived(_) => {
                self.friend_requests
                    .load(&self.request_user_attributes)
                    .await?;
            }
            PushEvent::FriendshipAccepted(_) => {
                self.users
                    .load(&user_id, &attributes(&FRIENDS_ATTRIBUTES))
                    .await?;
                self.friend_requests
                    .load(&self.request_user_attributes)
                    .await?;
            }
        }

        debug!(user_id = %user_id, event_type = %event_type, "User data refreshed");
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "UserDataLiveUpdater"
    }
}
