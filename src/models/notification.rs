use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::User;
use crate::entity::{EntityId, EntityRef};

/// What a notification is about
#[derive(Debug, Clone)]
pub enum NotificationKind {
    FriendRequestReceived {
        request_id: EntityId,
        user: EntityRef<User>,
    },
    FriendRequestAccepted {
        user: EntityRef<User>,
    },
    TokenReceived {
        amount: Decimal,
        from: Option<EntityRef<User>>,
    },
}

impl NotificationKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NotificationKind::FriendRequestReceived { .. } => "friend_request_received",
            NotificationKind::FriendRequestAccepted { .. } => "friend_request_accepted",
            NotificationKind::TokenReceived { .. } => "token_received",
        }
    }

    /// User the notification refers to, if any
    pub fn user(&self) -> Option<&EntityRef<User>> {
        match self {
            NotificationKind::FriendRequestReceived { user, .. }
            | NotificationKind::FriendRequestAccepted { user } => Some(user),
            NotificationKind::TokenReceived { from, .. } => from.as_ref(),
        }
    }
}

/// User-facing notification built from a push event.
///
/// The id is generated locally since push payloads carry none.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}
