use rust_decimal::Decimal;

use crate::entity::{EntityId, EntityRef};
use crate::models::Game;
use crate::server::CartItemRequest;

/// A game in the cart
#[derive(Debug, Clone)]
pub struct GameItem {
    /// Assigned by the server once the add is confirmed
    pub id: Option<EntityId>,
    pub game: EntityRef<Game>,
}

/// A bundle of store tokens in the cart
#[derive(Debug, Clone)]
pub struct TokenItem {
    pub id: Option<EntityId>,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub enum CartItem {
    Game(GameItem),
    Tokens(TokenItem),
}

impl CartItem {
    pub fn game(game: EntityRef<Game>) -> Self {
        CartItem::Game(GameItem { id: None, game })
    }

    pub fn tokens(quantity: u32, unit_price: Decimal) -> Self {
        CartItem::Tokens(TokenItem {
            id: None,
            quantity,
            unit_price,
        })
    }

    pub fn id(&self) -> Option<&EntityId> {
        match self {
            CartItem::Game(item) => item.id.as_ref(),
            CartItem::Tokens(item) => item.id.as_ref(),
        }
    }

    pub(crate) fn set_id(&mut self, id: Option<EntityId>) {
        match self {
            CartItem::Game(item) => item.id = id,
            CartItem::Tokens(item) => item.id = id,
        }
    }

    /// Price of the item; a game whose price is not loaded counts as zero
    pub fn price(&self) -> Decimal {
        match self {
            CartItem::Game(item) => item.game.read().price.unwrap_or_default(),
            CartItem::Tokens(item) => item.unit_price * Decimal::from(item.quantity),
        }
    }

    /// Games are the same item when they reference the same game, token
    /// bundles when they hold the same quantity
    pub fn is_same_as(&self, other: &CartItem) -> bool {
        match (self, other) {
            (CartItem::Game(a), CartItem::Game(b)) => a.game.id() == b.game.id(),
            (CartItem::Tokens(a), CartItem::Tokens(b)) => a.quantity == b.quantity,
            _ => false,
        }
    }

    pub fn to_request(&self) -> CartItemRequest {
        match self {
            CartItem::Game(item) => CartItemRequest::Game {
                game_id: item.game.id(),
            },
            CartItem::Tokens(item) => CartItemRequest::Tokens {
                quantity: item.quantity,
            },
        }
    }
}
