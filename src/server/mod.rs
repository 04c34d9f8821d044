// Remote store API seen from the client
//
// Everything the caches and the cart need from the backend goes through the
// `StoreServer` trait so the same core runs against the real HTTP client or
// the in-memory implementation used in development and tests.

// Public API - what other modules can use
pub use in_memory::{InMemoryStoreServer, ServerCall};
pub use records::{CartItemRecord, CartItemRequest, Page, PurchaseRecord};

// Internal modules
mod in_memory;
mod records;

use async_trait::async_trait;

use crate::entity::EntityId;
use crate::models::{FriendRequestRecord, Game, Order, OrderType, User};
use crate::shared::AppError;

/// Calls the client makes against the store backend
#[async_trait]
pub trait StoreServer: Send + Sync {
    async fn get_game(
        &self,
        id: &EntityId,
        attributes: &[String],
        authenticated: bool,
    ) -> Result<Game, AppError>;

    /// Batched lookup; unknown ids are left out of the response
    async fn get_games(
        &self,
        ids: &[EntityId],
        attributes: &[String],
        authenticated: bool,
    ) -> Result<Vec<Game>, AppError>;

    async fn search_games(
        &self,
        query: &str,
        attributes: &[String],
        authenticated: bool,
        page: u32,
    ) -> Result<Page<Game>, AppError>;

    async fn get_user(&self, id: &EntityId, attributes: &[String]) -> Result<User, AppError>;

    async fn get_users(&self, ids: &[EntityId], attributes: &[String])
        -> Result<Vec<User>, AppError>;

    async fn search_users(
        &self,
        query: &str,
        attributes: &[String],
        page: u32,
    ) -> Result<Page<User>, AppError>;

    async fn get_cart(&self, attributes: &[String]) -> Result<Vec<CartItemRecord>, AppError>;

    /// Returns the stored item carrying its server id
    async fn add_cart_item(&self, item: &CartItemRequest) -> Result<CartItemRecord, AppError>;

    async fn remove_cart_item(&self, item: &CartItemRequest) -> Result<(), AppError>;

    async fn buy_cart_items(&self) -> Result<PurchaseRecord, AppError>;

    async fn get_orders(
        &self,
        ids: Option<&[EntityId]>,
        attributes: &[String],
        page: u32,
        page_size: u32,
        order_type: Option<OrderType>,
    ) -> Result<Page<Order>, AppError>;

    async fn refund_order(
        &self,
        id: &EntityId,
        game_ids: &[EntityId],
        attributes: &[String],
    ) -> Result<Order, AppError>;

    /// Pending requests in both directions, with the counterpart user projected
    /// to `user_attributes`
    async fn get_friend_requests(
        &self,
        user_attributes: &[String],
    ) -> Result<Vec<FriendRequestRecord>, AppError>;

    async fn send_friend_request(&self, user_id: &EntityId)
        -> Result<FriendRequestRecord, AppError>;

    async fn accept_friend_request(&self, id: &EntityId) -> Result<(), AppError>;

    /// Declines an incoming request or cancels an outgoing one
    async fn decline_friend_request(&self, id: &EntityId) -> Result<(), AppError>;
}
