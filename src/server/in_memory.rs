use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use super::records::{CartItemRecord, CartItemRequest, Page, PurchaseRecord};
use super::StoreServer;
use crate::entity::EntityId;
use crate::models::{
    FriendRequestRecord, Game, Order, OrderItem, OrderType, RequestDirection, User,
};
use crate::shared::AppError;

const SEARCH_PAGE_SIZE: u32 = 10;

/// One request received by the in-memory server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCall {
    pub operation: &'static str,
    pub ids: Vec<EntityId>,
}

struct StoreData {
    games: BTreeMap<EntityId, Game>,
    users: BTreeMap<EntityId, User>,
    /// Oldest first
    orders: Vec<Order>,
    cart: Vec<CartItemRecord>,
    /// Seen from the signed-in user's side
    friend_requests: Vec<FriendRequestRecord>,
    owned_games: HashSet<EntityId>,
    current_user: Option<EntityId>,
    token_unit_price: Decimal,
    next_id: u64,
}

impl StoreData {
    fn next_id(&mut self, prefix: &str) -> EntityId {
        self.next_id += 1;
        EntityId::new(format!("{}{}", prefix, self.next_id))
    }

    fn signed_in(&self) -> Result<EntityId, AppError> {
        self.current_user
            .clone()
            .ok_or_else(|| AppError::rejected("unauthenticated", "Sign in required"))
    }

    /// Game with the per-user flags filled in when the request is authenticated
    fn decorated_game(&self, game: &Game, authenticated: bool) -> Game {
        let mut game = game.clone();
        if authenticated {
            game.owned = Some(self.owned_games.contains(&game.id));
            game.in_cart = Some(self.cart.iter().any(|item| {
                matches!(item, CartItemRecord::Game { game: in_cart, .. } if in_cart.id == game.id)
            }));
        } else {
            game.owned = None;
            game.in_cart = None;
        }
        game
    }

    fn user_mut(&mut self, id: &EntityId) -> Result<&mut User, AppError> {
        self.users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    fn befriend(&mut self, first: &EntityId, second: &EntityId) -> Result<(), AppError> {
        for (user, friend) in [(first, second), (second, first)] {
            let friends = self.user_mut(user)?.friends.get_or_insert_with(Vec::new);
            if !friends.contains(friend) {
                friends.push(friend.clone());
            }
        }
        Ok(())
    }
}

/// Store backend kept entirely in memory.
///
/// Serves the development binary and tests. Every call is recorded, and a
/// failure can be queued for the next call of a given operation.
pub struct InMemoryStoreServer {
    data: Mutex<StoreData>,
    calls: Mutex<Vec<ServerCall>>,
    failures: Mutex<HashMap<&'static str, AppError>>,
}

impl Default for InMemoryStoreServer {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStoreServer {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(StoreData {
                games: BTreeMap::new(),
                users: BTreeMap::new(),
                orders: Vec::new(),
                cart: Vec::new(),
                friend_requests: Vec::new(),
                owned_games: HashSet::new(),
                current_user: None,
                token_unit_price: Decimal::new(1, 2),
                next_id: 0,
            }),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `user` and treats every request as coming from them
    pub fn with_current_user(self, user: User) -> Self {
        {
            let mut data = self.data();
            data.current_user = Some(user.id.clone());
            data.users.insert(user.id.clone(), user);
        }
        self
    }

    fn data(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_game(&self, game: Game) {
        self.data().games.insert(game.id.clone(), game);
    }

    pub fn insert_user(&self, user: User) {
        self.data().users.insert(user.id.clone(), user);
    }

    pub fn insert_friend_request(&self, record: FriendRequestRecord) {
        self.data().friend_requests.push(record);
    }

    pub fn set_token_unit_price(&self, price: Decimal) {
        self.data().token_unit_price = price;
    }

    /// Adds tokens to a user's balance, as a transfer from another user would
    pub fn credit_tokens(&self, user_id: &EntityId, amount: Decimal) -> Result<(), AppError> {
        let mut data = self.data();
        let user = data.user_mut(user_id)?;
        user.token_balance = Some(user.token_balance.unwrap_or_default() + amount);
        Ok(())
    }

    /// Completes an outgoing request as if the other user had accepted it
    pub fn complete_outgoing_request(&self, request_id: &EntityId) -> Result<EntityId, AppError> {
        let mut data = self.data();
        let current = data.signed_in()?;
        let index = data
            .friend_requests
            .iter()
            .position(|r| r.id == *request_id && r.direction == RequestDirection::Outgoing)
            .ok_or_else(|| AppError::NotFound(format!("friend request {}", request_id)))?;
        let record = data.friend_requests.remove(index);
        data.befriend(&current, &record.user.id)?;
        Ok(record.user.id)
    }

    pub fn user(&self, id: &EntityId) -> Option<User> {
        self.data().users.get(id).cloned()
    }

    pub fn cart_len(&self) -> usize {
        self.data().cart.len()
    }

    /// Makes the next call of `operation` fail with `error`
    pub fn fail_next(&self, operation: &'static str, error: AppError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation, error);
    }

    pub fn calls(&self) -> Vec<ServerCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    /// Records the call and returns any failure queued for it
    fn begin(&self, operation: &'static str, ids: &[EntityId]) -> Result<(), AppError> {
        debug!(operation, ids = ids.len(), "In-memory server call");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ServerCall {
                operation,
                ids: ids.to_vec(),
            });

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(operation);
        match failure {
            Some(error) => {
                warn!(operation, error = %error, "Injected failure");
                Err(error)
            }
            None => Ok(()),
        }
    }
}

/// Keeps only `id` and the requested attributes of a record
fn project<T: Serialize + DeserializeOwned>(record: &T, attributes: &[String]) -> Result<T, AppError> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(fields) = &mut value {
        fields.retain(|key, _| key == "id" || attributes.iter().any(|a| a == key));
    }
    Ok(serde_json::from_value(value)?)
}

fn project_all<T: Serialize + DeserializeOwned>(
    records: &[T],
    attributes: &[String],
) -> Result<Vec<T>, AppError> {
    records
        .iter()
        .map(|record| project(record, attributes))
        .collect()
}

/// 1-based pagination
fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let size = page_size as usize;
    let total_pages = u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX);

    Page {
        entries: items
            .into_iter()
            .skip((page as usize - 1) * size)
            .take(size)
            .collect(),
        page_number: page,
        page_size,
        total_pages,
    }
}

fn matches_query(value: Option<&String>, query: &str) -> bool {
    value.is_some_and(|value| value.to_lowercase().contains(&query.to_lowercase()))
}

#[async_trait]
impl StoreServer for InMemoryStoreServer {
    async fn get_game(
        &self,
        id: &EntityId,
        attributes: &[String],
        authenticated: bool,
    ) -> Result<Game, AppError> {
        self.begin("get_game", std::slice::from_ref(id))?;
        let data = self.data();
        let game = data
            .games
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("game {}", id)))?;
        project(&data.decorated_game(game, authenticated), attributes)
    }

    async fn get_games(
        &self,
        ids: &[EntityId],
        attributes: &[String],
        authenticated: bool,
    ) -> Result<Vec<Game>, AppError> {
        self.begin("get_games", ids)?;
        let data = self.data();
        let games: Vec<Game> = ids
            .iter()
            .filter_map(|id| data.games.get(id))
            .map(|game| data.decorated_game(game, authenticated))
            .collect();
        project_all(&games, attributes)
    }

    async fn search_games(
        &self,
        query: &str,
        attributes: &[String],
        authenticated: bool,
        page: u32,
    ) -> Result<Page<Game>, AppError> {
        self.begin("search_games", &[])?;
        let data = self.data();
        let hits: Vec<Game> = data
            .games
            .values()
            .filter(|game| matches_query(game.name.as_ref(), query))
            .map(|game| data.decorated_game(game, authenticated))
            .collect();
        let page = paginate(hits, page, SEARCH_PAGE_SIZE);
        Ok(Page {
            entries: project_all(&page.entries, attributes)?,
            ..page
        })
    }

    async fn get_user(&self, id: &EntityId, attributes: &[String]) -> Result<User, AppError> {
        self.begin("get_user", std::slice::from_ref(id))?;
        let data = self.data();
        let user = data
            .users
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
        project(user, attributes)
    }

    async fn get_users(
        &self,
        ids: &[EntityId],
        attributes: &[String],
    ) -> Result<Vec<User>, AppError> {
        self.begin("get_users", ids)?;
        let data = self.data();
        let users: Vec<User> = ids
            .iter()
            .filter_map(|id| data.users.get(id).cloned())
            .collect();
        project_all(&users, attributes)
    }

    async fn search_users(
        &self,
        query: &str,
        attributes: &[String],
        page: u32,
    ) -> Result<Page<User>, AppError> {
        self.begin("search_users", &[])?;
        let data = self.data();
        let hits: Vec<User> = data
            .users
            .values()
            .filter(|user| matches_query(user.username.as_ref(), query))
            .cloned()
            .collect();
        let page = paginate(hits, page, SEARCH_PAGE_SIZE);
        Ok(Page {
            entries: project_all(&page.entries, attributes)?,
            ..page
        })
    }

    async fn get_cart(&self, attributes: &[String]) -> Result<Vec<CartItemRecord>, AppError> {
        self.begin("get_cart", &[])?;
        let data = self.data();
        data.signed_in()?;

        data.cart
            .iter()
            .map(|item| -> Result<CartItemRecord, AppError> {
                match item {
                    CartItemRecord::Game { id, game } => {
                        let game = data.games.get(&game.id).unwrap_or(game);
                        Ok(CartItemRecord::Game {
                            id: id.clone(),
                            game: project(&data.decorated_game(game, true), attributes)?,
                        })
                    }
                    tokens @ CartItemRecord::Tokens { .. } => Ok(tokens.clone()),
                }
            })
            .collect()
    }

    async fn add_cart_item(&self, item: &CartItemRequest) -> Result<CartItemRecord, AppError> {
        let ids = match item {
            CartItemRequest::Game { game_id } => vec![game_id.clone()],
            CartItemRequest::Tokens { .. } => Vec::new(),
        };
        self.begin("add_cart_item", &ids)?;

        let mut data = self.data();
        data.signed_in()?;

        let record = match item {
            CartItemRequest::Game { game_id } => {
                let game = data
                    .games
                    .get(game_id)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound(format!("game {}", game_id)))?;
                if data.owned_games.contains(game_id) {
                    return Err(AppError::rejected("already_owned", "Game already owned"));
                }
                if data.cart.iter().any(|existing| {
                    matches!(existing, CartItemRecord::Game { game, .. } if game.id == *game_id)
                }) {
                    return Err(AppError::rejected("duplicate_item", "Game already in cart"));
                }
                CartItemRecord::Game {
                    id: data.next_id("cart-"),
                    game,
                }
            }
            CartItemRequest::Tokens { quantity } => {
                if *quantity == 0 {
                    return Err(AppError::rejected("invalid_quantity", "Quantity must be positive"));
                }
                CartItemRecord::Tokens {
                    id: data.next_id("cart-"),
                    quantity: *quantity,
                    unit_price: data.token_unit_price,
                }
            }
        };

        data.cart.push(record.clone());
        Ok(record)
    }

    async fn remove_cart_item(&self, item: &CartItemRequest) -> Result<(), AppError> {
        self.begin("remove_cart_item", &[])?;
        let mut data = self.data();
        data.signed_in()?;

        let index = data
            .cart
            .iter()
            .position(|existing| match (existing, item) {
                (CartItemRecord::Game { game, .. }, CartItemRequest::Game { game_id }) => {
                    game.id == *game_id
                }
                (
                    CartItemRecord::Tokens { quantity, .. },
                    CartItemRequest::Tokens { quantity: requested },
                ) => quantity == requested,
                _ => false,
            })
            .ok_or_else(|| AppError::NotFound("cart item".to_string()))?;

        data.cart.remove(index);
        Ok(())
    }

    async fn buy_cart_items(&self) -> Result<PurchaseRecord, AppError> {
        self.begin("buy_cart_items", &[])?;
        let mut data = self.data();
        let user_id = data.signed_in()?;

        if data.cart.is_empty() {
            return Err(AppError::rejected("empty_cart", "Cart is empty"));
        }

        let mut items = Vec::new();
        let mut tokens = Decimal::ZERO;
        let mut total = Decimal::ZERO;
        for record in std::mem::take(&mut data.cart) {
            match record {
                CartItemRecord::Game { game, .. } => {
                    let price = data
                        .games
                        .get(&game.id)
                        .and_then(|g| g.price)
                        .unwrap_or_default();
                    total += price;
                    data.owned_games.insert(game.id.clone());
                    items.push(OrderItem {
                        game_id: game.id,
                        price,
                        refunded: false,
                    });
                }
                CartItemRecord::Tokens {
                    quantity,
                    unit_price,
                    ..
                } => {
                    tokens += Decimal::from(quantity);
                    total += unit_price * Decimal::from(quantity);
                }
            }
        }

        let user = data.user_mut(&user_id)?;
        let token_balance = user.token_balance.unwrap_or_default() + tokens;
        user.token_balance = Some(token_balance);

        let order = Order {
            id: data.next_id("order-"),
            order_type: Some(OrderType::Purchase),
            created_at: Some(Utc::now()),
            items: Some(items),
            total: Some(total),
            token_amount: Some(tokens),
        };
        data.orders.push(order.clone());

        Ok(PurchaseRecord {
            order,
            token_balance,
        })
    }

    async fn get_orders(
        &self,
        ids: Option<&[EntityId]>,
        attributes: &[String],
        page: u32,
        page_size: u32,
        order_type: Option<OrderType>,
    ) -> Result<Page<Order>, AppError> {
        self.begin("get_orders", ids.unwrap_or_default())?;
        let data = self.data();
        data.signed_in()?;

        let orders: Vec<Order> = data
            .orders
            .iter()
            .rev()
            .filter(|order| ids.map_or(true, |ids| ids.contains(&order.id)))
            .filter(|order| order_type.is_none() || order.order_type == order_type)
            .cloned()
            .collect();
        let page = paginate(orders, page, page_size);
        Ok(Page {
            entries: project_all(&page.entries, attributes)?,
            ..page
        })
    }

    async fn refund_order(
        &self,
        id: &EntityId,
        game_ids: &[EntityId],
        attributes: &[String],
    ) -> Result<Order, AppError> {
        self.begin("refund_order", std::slice::from_ref(id))?;
        let mut data = self.data();
        data.signed_in()?;

        let order = data
            .orders
            .iter_mut()
            .find(|order| order.id == *id)
            .ok_or_else(|| AppError::NotFound(format!("order {}", id)))?;
        if order.order_type != Some(OrderType::Purchase) {
            return Err(AppError::rejected("not_refundable", "Only purchases can be refunded"));
        }

        let mut refunded = Vec::new();
        for item in order.items.iter_mut().flatten() {
            if !item.refunded && game_ids.contains(&item.game_id) {
                item.refunded = true;
                refunded.push(item.game_id.clone());
            }
        }
        if refunded.is_empty() {
            return Err(AppError::rejected("nothing_to_refund", "No refundable items selected"));
        }

        let order = order.clone();
        for game_id in &refunded {
            data.owned_games.remove(game_id);
        }
        project(&order, attributes)
    }

    async fn get_friend_requests(
        &self,
        user_attributes: &[String],
    ) -> Result<Vec<FriendRequestRecord>, AppError> {
        self.begin("get_friend_requests", &[])?;
        let data = self.data();
        data.signed_in()?;

        data.friend_requests
            .iter()
            .map(|record| -> Result<FriendRequestRecord, AppError> {
                let user = data.users.get(&record.user.id).unwrap_or(&record.user);
                Ok(FriendRequestRecord {
                    user: project(user, user_attributes)?,
                    ..record.clone()
                })
            })
            .collect()
    }

    async fn send_friend_request(
        &self,
        user_id: &EntityId,
    ) -> Result<FriendRequestRecord, AppError> {
        self.begin("send_friend_request", std::slice::from_ref(user_id))?;
        let mut data = self.data();
        let current = data.signed_in()?;

        let user = data
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
        if user.is_friend(&current) {
            return Err(AppError::rejected("already_friends", "Already friends"));
        }
        if data.friend_requests.iter().any(|r| r.user.id == *user_id) {
            return Err(AppError::rejected("duplicate_request", "Request already pending"));
        }

        let record = FriendRequestRecord {
            id: data.next_id("request-"),
            user,
            direction: RequestDirection::Outgoing,
            created_at: Utc::now(),
        };
        data.friend_requests.push(record.clone());
        Ok(record)
    }

    async fn accept_friend_request(&self, id: &EntityId) -> Result<(), AppError> {
        self.begin("accept_friend_request", std::slice::from_ref(id))?;
        let mut data = self.data();
        let current = data.signed_in()?;

        let index = data
            .friend_requests
            .iter()
            .position(|r| r.id == *id && r.direction == RequestDirection::Incoming)
            .ok_or_else(|| AppError::NotFound(format!("friend request {}", id)))?;
        let record = data.friend_requests.remove(index);
        data.befriend(&current, &record.user.id)
    }

    async fn decline_friend_request(&self, id: &EntityId) -> Result<(), AppError> {
        self.begin("decline_friend_request", std::slice::from_ref(id))?;
        let mut data = self.data();
        data.signed_in()?;

        let index = data
            .friend_requests
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| AppError::NotFound(format!("friend request {}", id)))?;
        data.friend_requests.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn priced_game(id: &str, name: &str, price: Decimal) -> Game {
        let mut game = Game::with_id(id);
        game.name = Some(name.to_string());
        game.price = Some(price);
        game.description = Some("A game".to_string());
        game
    }

    fn signed_in_server() -> InMemoryStoreServer {
        let mut user = User::with_id("me");
        user.username = Some("me".to_string());
        user.token_balance = Some(Decimal::ZERO);
        InMemoryStoreServer::new().with_current_user(user)
    }

    #[tokio::test]
    async fn projects_requested_attributes_only() {
        let server = signed_in_server();
        server.insert_game(priced_game("1", "Hades", Decimal::new(2499, 2)));

        let game = server
            .get_game(&EntityId::new("1"), &attrs(&["name"]), false)
            .await
            .unwrap();

        assert_eq!(game.name.as_deref(), Some("Hades"));
        assert_eq!(game.price, None);
        assert_eq!(game.description, None);
    }

    #[tokio::test]
    async fn ownership_flags_require_authentication() {
        let server = signed_in_server();
        server.insert_game(priced_game("1", "Hades", Decimal::new(2499, 2)));
        let requested = attrs(&["owned", "inCart"]);

        let anonymous = server
            .get_game(&EntityId::new("1"), &requested, false)
            .await
            .unwrap();
        let authenticated = server
            .get_game(&EntityId::new("1"), &requested, true)
            .await
            .unwrap();

        assert_eq!(anonymous.owned, None);
        assert_eq!(authenticated.owned, Some(false));
        assert_eq!(authenticated.in_cart, Some(false));
    }

    #[tokio::test]
    async fn queued_failure_applies_once() {
        let server = signed_in_server();
        server.insert_game(priced_game("1", "Hades", Decimal::new(2499, 2)));
        server.fail_next("get_game", AppError::Network("timeout".to_string()));

        let first = server.get_game(&EntityId::new("1"), &[], false).await;
        let second = server.get_game(&EntityId::new("1"), &[], false).await;

        assert!(matches!(first, Err(AppError::Network(_))));
        assert!(second.is_ok());
        assert_eq!(server.call_count("get_game"), 2);
    }

    #[tokio::test]
    async fn search_paginates_matches() {
        let server = signed_in_server();
        for n in 0..12 {
            server.insert_game(priced_game(
                &format!("{:02}", n),
                &format!("Quest {}", n),
                Decimal::ONE,
            ));
        }
        server.insert_game(priced_game("99", "Other", Decimal::ONE));

        let first = server
            .search_games("quest", &attrs(&["name"]), false, 1)
            .await
            .unwrap();
        let second = server
            .search_games("quest", &attrs(&["name"]), false, 2)
            .await
            .unwrap();

        assert_eq!(first.entries.len(), 10);
        assert_eq!(second.entries.len(), 2);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next());
    }

    #[tokio::test]
    async fn checkout_creates_order_and_credits_tokens() {
        let server = signed_in_server();
        server.insert_game(priced_game("1", "Hades", Decimal::new(2000, 2)));
        server
            .add_cart_item(&CartItemRequest::Game {
                game_id: EntityId::new("1"),
            })
            .await
            .unwrap();
        server
            .add_cart_item(&CartItemRequest::Tokens { quantity: 100 })
            .await
            .unwrap();

        let purchase = server.buy_cart_items().await.unwrap();

        assert_eq!(purchase.order.total, Some(Decimal::new(2100, 2)));
        assert_eq!(purchase.token_balance, Decimal::from(100));
        assert_eq!(server.cart_len(), 0);

        let game = server
            .get_game(&EntityId::new("1"), &attrs(&["owned"]), true)
            .await
            .unwrap();
        assert_eq!(game.owned, Some(true));
    }

    #[tokio::test]
    async fn duplicate_cart_item_is_rejected() {
        let server = signed_in_server();
        server.insert_game(priced_game("1", "Hades", Decimal::ONE));
        let request = CartItemRequest::Game {
            game_id: EntityId::new("1"),
        };

        server.add_cart_item(&request).await.unwrap();
        let result = server.add_cart_item(&request).await;

        assert!(matches!(result, Err(AppError::Rejected { kind, .. }) if kind == "duplicate_item"));
    }

    #[tokio::test]
    async fn accepting_a_request_makes_friends() {
        let server = signed_in_server();
        let mut other = User::with_id("u2");
        other.username = Some("kit".to_string());
        server.insert_user(other.clone());
        server.insert_friend_request(FriendRequestRecord {
            id: EntityId::new("r1"),
            user: other,
            direction: RequestDirection::Incoming,
            created_at: Utc::now(),
        });

        server
            .accept_friend_request(&EntityId::new("r1"))
            .await
            .unwrap();

        let me = server.user(&EntityId::new("me")).unwrap();
        assert!(me.is_friend(&EntityId::new("u2")));
        assert!(server
            .get_friend_requests(&attrs(&["username"]))
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn pagination_clamps_page_zero() {
        let page = paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.entries, vec![1, 2]);
        assert_eq!(page.total_pages, 2);
    }
}
