use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::entity::{overwrite, Entity, EntityId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderType {
    Purchase,
    Refund,
}

/// One purchased game inside an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub game_id: EntityId,
    pub price: Decimal,
    #[serde(default)]
    pub refunded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: EntityId,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    /// Tokens spent or credited by this order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_amount: Option<Decimal>,
}

impl Order {
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            order_type: None,
            created_at: None,
            items: None,
            total: None,
            token_amount: None,
        }
    }

    /// Items that can still be refunded
    pub fn refundable_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items
            .iter()
            .flatten()
            .filter(|item| !item.refunded)
    }
}

impl Entity for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge(&mut self, data: Self) {
        overwrite(&mut self.order_type, data.order_type);
        overwrite(&mut self.created_at, data.created_at);
        overwrite(&mut self.items, data.items);
        overwrite(&mut self.total, data.total);
        overwrite(&mut self.token_amount, data.token_amount);
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        match attribute {
            "id" => true,
            "type" => self.order_type.is_some(),
            "createdAt" => self.created_at.is_some(),
            "items" => self.items.is_some(),
            "total" => self.total.is_some(),
            "tokenAmount" => self.token_amount.is_some(),
            _ => false,
        }
    }
}
