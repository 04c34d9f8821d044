use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::entity::EntityId;

/// Authentication state shared by every component.
///
/// Holds the id of the signed-in user; `None` means signed out. Listeners
/// observe transitions through [`Session::subscribe`].
#[derive(Debug, Clone)]
pub struct Session {
    current_user: Arc<watch::Sender<Option<EntityId>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            current_user: Arc::new(sender),
        }
    }

    pub fn login(&self, user_id: EntityId) {
        info!(user_id = %user_id, "User signed in");
        self.current_user.send_replace(Some(user_id));
    }

    pub fn logout(&self) {
        if let Some(user_id) = self.current_user.send_replace(None) {
            info!(user_id = %user_id, "User signed out");
        }
    }

    pub fn current_user(&self) -> Option<EntityId> {
        self.current_user.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<EntityId>> {
        self.current_user.subscribe()
    }
}
