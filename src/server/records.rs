use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::models::{Game, Order};

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }
}

/// Cart line as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartItemRecord {
    Game {
        id: EntityId,
        game: Game,
    },
    Tokens {
        id: EntityId,
        quantity: u32,
        #[serde(rename = "unitPrice")]
        unit_price: Decimal,
    },
}

impl CartItemRecord {
    pub fn id(&self) -> &EntityId {
        match self {
            CartItemRecord::Game { id, .. } | CartItemRecord::Tokens { id, .. } => id,
        }
    }
}

/// What the client asks the server to add or remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartItemRequest {
    Game {
        #[serde(rename = "gameId")]
        game_id: EntityId,
    },
    Tokens {
        quantity: u32,
    },
}

/// Checkout result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub order: Order,
    pub token_balance: Decimal,
}
