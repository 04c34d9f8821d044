use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;
use crate::entity::{overwrite, Entity, EntityId};

/// Prefix for ids handed out before the server confirms a request
pub const TEMPORARY_ID_PREFIX: &str = "tmp-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDirection {
    Incoming,
    Outgoing,
}

/// Pending friendship between the current user and `user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub id: EntityId,
    /// The other side of the request; the record itself lives in the user repository
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<RequestDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FriendRequest {
    /// Outgoing request created locally, before the server has assigned an id
    pub fn pending_to(user: EntityId) -> Self {
        Self {
            id: EntityId::new(format!("{}{}", TEMPORARY_ID_PREFIX, Uuid::new_v4())),
            user: Some(user),
            direction: Some(RequestDirection::Outgoing),
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.id.as_str().starts_with(TEMPORARY_ID_PREFIX)
    }
}

impl Entity for FriendRequest {
    const KIND: &'static str = "friend_request";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge(&mut self, data: Self) {
        overwrite(&mut self.user, data.user);
        overwrite(&mut self.direction, data.direction);
        overwrite(&mut self.created_at, data.created_at);
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        match attribute {
            "id" => true,
            "user" => self.user.is_some(),
            "direction" => self.direction.is_some(),
            "createdAt" => self.created_at.is_some(),
            _ => false,
        }
    }
}

/// Friend request as the server sends it, with the counterpart user embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestRecord {
    pub id: EntityId,
    pub user: User,
    pub direction: RequestDirection,
    pub created_at: DateTime<Utc>,
}

impl FriendRequestRecord {
    /// Splits the record into the request and the embedded user
    pub fn into_parts(self) -> (FriendRequest, User) {
        let request = FriendRequest {
            id: self.id,
            user: Some(self.user.id.clone()),
            direction: Some(self.direction),
            created_at: Some(self.created_at),
        };
        (request, self.user)
    }
}
