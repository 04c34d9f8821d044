use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::entity::EntityId;
use crate::models::{FriendRequestRecord, User};
use crate::shared::AppError;

/// Push frame as delivered by the connector, before decoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPushEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

impl RawPushEvent {
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }
}

/// Event types the client reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PushEventType {
    TokenReceived,
    FriendshipReceived,
    FriendshipAccepted,
}

/// Another user sent tokens to the signed-in user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReceived {
    pub amount: Decimal,
    /// Sender, absent for system credits
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipReceived {
    pub request: FriendRequestRecord,
}

/// An outgoing friend request was accepted
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipAccepted {
    pub user: User,
    pub request_id: EntityId,
}

/// Decoded push event
#[derive(Debug, Clone)]
pub enum PushEvent {
    TokenReceived(TokenReceived),
    FriendshipReceived(FriendshipReceived),
    FriendshipAccepted(FriendshipAccepted),
}

impl PushEvent {
    /// Decodes a raw frame.
    ///
    /// Unknown event types yield `Ok(None)`; a known type with a payload that
    /// does not match yields an error.
    pub fn decode(raw: &RawPushEvent) -> Result<Option<Self>, AppError> {
        let Ok(event_type) = raw.event_type.parse::<PushEventType>() else {
            return Ok(None);
        };

        let data = raw.data.clone();
        let event = match event_type {
            PushEventType::TokenReceived => PushEvent::TokenReceived(serde_json::from_value(data)?),
            PushEventType::FriendshipReceived => {
                PushEvent::FriendshipReceived(serde_json::from_value(data)?)
            }
            PushEventType::FriendshipAccepted => {
                PushEvent::FriendshipAccepted(serde_json::from_value(data)?)
            }
        };
        Ok(Some(event))
    }

    pub fn event_type(&self) -> PushEventType {
        match self {
            PushEvent::TokenReceived(_) => PushEventType::TokenReceived,
            PushEvent::FriendshipReceived(_) => PushEventType::FriendshipReceived,
            PushEvent::FriendshipAccepted(_) => PushEventType::FriendshipAccepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn decodes_token_received() {
        let raw = RawPushEvent::new(
            "token_received",
            json!({ "amount": "12.50", "user": { "id": 7, "username": "kit" } }),
        );

        let Some(PushEvent::TokenReceived(event)) = PushEvent::decode(&raw).unwrap() else {
            panic!("expected token_received");
        };

        assert_eq!(event.amount, Decimal::new(1250, 2));
        let sender = event.user.unwrap();
        assert_eq!(sender.id, EntityId::new("7"));
        assert_eq!(sender.username.as_deref(), Some("kit"));
    }

    #[test]
    fn decodes_friendship_received() {
        let raw = RawPushEvent::new(
            "friendship_received",
            json!({
                "request": {
                    "id": "r1",
                    "user": { "id": "u2", "username": "kit" },
                    "direction": "incoming",
                    "createdAt": "2024-03-01T10:00:00Z"
                }
            }),
        );

        let event = PushEvent::decode(&raw).unwrap().unwrap();

        assert_eq!(event.event_type(), PushEventType::FriendshipReceived);
    }

    #[test]
    fn decodes_friendship_accepted() {
        let raw = RawPushEvent::new(
            "friendship_accepted",
            json!({ "user": { "id": "u2" }, "requestId": "r9" }),
        );

        let Some(PushEvent::FriendshipAccepted(event)) = PushEvent::decode(&raw).unwrap() else {
            panic!("expected friendship_accepted");
        };

        assert_eq!(event.request_id, EntityId::new("r9"));
    }

    #[rstest]
    #[case("game_released")]
    #[case("")]
    #[case("TOKEN_RECEIVED")]
    fn unknown_types_are_ignored(#[case] event_type: &str) {
        let raw = RawPushEvent::new(event_type, json!({}));
        assert!(PushEvent::decode(&raw).unwrap().is_none());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let raw = RawPushEvent::new("token_received", json!({ "amount": "lots" }));

        assert!(matches!(
            PushEvent::decode(&raw),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn raw_frame_parses_from_json() {
        let raw: RawPushEvent =
            serde_json::from_str(r#"{"type":"token_received","data":{"amount":1}}"#).unwrap();
        assert_eq!(raw.event_type, PushEventType::TokenReceived.as_ref());
    }
}
