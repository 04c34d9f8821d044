use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::{overwrite, Entity, EntityId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friends: Option<Vec<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

impl User {
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            username: None,
            avatar: None,
            token_balance: None,
            friends: None,
            online: None,
        }
    }

    pub fn is_friend(&self, other: &EntityId) -> bool {
        self.friends
            .as_ref()
            .is_some_and(|friends| friends.contains(other))
    }
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge(&mut self, data: Self) {
        overwrite(&mut self.username, data.username);
        overwrite(&mut self.avatar, data.avatar);
        overwrite(&mut self.token_balance, data.token_balance);
        overwrite(&mut self.friends, data.friends);
        overwrite(&mut self.online, data.online);
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        match attribute {
            "id" => true,
            "username" => self.username.is_some(),
            "avatar" => self.avatar.is_some(),
            "tokenBalance" => self.token_balance.is_some(),
            "friends" => self.friends.is_some(),
            "online" => self.online.is_some(),
            _ => false,
        }
    }
}
