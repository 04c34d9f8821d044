use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use super::items::{CartItem, GameItem, TokenItem};
use crate::entity::{EntityId, EntityRef};
use crate::models::{Game, Order, User};
use crate::repository::{GameRepository, OrderRepository, UserRepository};
use crate::server::{CartItemRecord, StoreServer};
use crate::session::Session;
use crate::shared::AppError;

/// Outcome of a checkout
#[derive(Debug, Clone)]
pub struct Purchase {
    pub order: EntityRef<Order>,
    pub token_balance: Decimal,
}

/// The signed-in user's cart.
///
/// Adds and removes apply locally before the server confirms them and are
/// rolled back when it refuses.
pub struct Cart {
    server: Arc<dyn StoreServer>,
    session: Session,
    games: Arc<GameRepository>,
    users: Arc<UserRepository>,
    orders: Arc<OrderRepository>,
    items: Mutex<Vec<CartItem>>,
    loaded: AtomicBool,
}

impl Cart {
    pub fn new(
        server: Arc<dyn StoreServer>,
        session: Session,
        games: Arc<GameRepository>,
        users: Arc<UserRepository>,
        orders: Arc<OrderRepository>,
    ) -> Self {
        Self {
            server,
            session,
            games,
            users,
            orders,
            items: Mutex::new(Vec::new()),
            loaded: AtomicBool::new(false),
        }
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the cart from the server.
    ///
    /// Once loaded, later calls only complete the games' attributes unless
    /// `force_reload` is set.
    #[instrument(skip(self, game_attributes))]
    pub async fn load(
        &self,
        game_attributes: &[String],
        force_reload: bool,
    ) -> Result<Vec<CartItem>, AppError> {
        if self.is_loaded() && !force_reload {
            debug!("Cart already loaded, filling games only");
            self.fill_games(game_attributes).await?;
            return Ok(self.items());
        }

        let records = self.server.get_cart(game_attributes).await?;
        let items: Vec<CartItem> = records
            .into_iter()
            .map(|record| match record {
                CartItemRecord::Game { id, game } => CartItem::Game(GameItem {
                    id: Some(id),
                    game: self.games.update(game, true),
                }),
                CartItemRecord::Tokens {
                    id,
                    quantity,
                    unit_price,
                } => CartItem::Tokens(TokenItem {
                    id: Some(id),
                    quantity,
                    unit_price,
                }),
            })
            .collect();

        info!(items = items.len(), "Cart loaded");
        *self.lock_items() = items.clone();
        self.loaded.store(true, Ordering::Release);
        Ok(items)
    }

    /// Completes the attributes of every game in the cart
    pub async fn fill_games(&self, attributes: &[String]) -> Result<(), AppError> {
        let games: Vec<EntityRef<Game>> = self
            .lock_items()
            .iter()
            .filter_map(|item| match item {
                CartItem::Game(item) => Some(item.game.clone()),
                CartItem::Tokens(_) => None,
            })
            .collect();
        if games.is_empty() {
            return Ok(());
        }

        let filled = self.games.fill(&games, attributes).await?;

        // Point items at the cached instances
        for item in self.lock_items().iter_mut() {
            if let CartItem::Game(item) = item {
                let id = item.game.id();
                if let Some(cached) = filled.iter().find(|game| game.id() == id) {
                    item.game = cached.clone();
                }
            }
        }
        Ok(())
    }

    /// Adds `item`, showing it right away.
    ///
    /// An equivalent item already in the cart makes this a no-op returning
    /// that item. On failure the item is taken back out and the server's error
    /// is returned.
    #[instrument(skip(self, item))]
    pub async fn add_item(&self, mut item: CartItem) -> Result<CartItem, AppError> {
        // Pending until the server assigns an id
        item.set_id(None);
        {
            let mut items = self.lock_items();
            if let Some(existing) = items.iter().find(|known| known.is_same_as(&item)) {
                debug!("Equivalent item already in cart");
                return Ok(existing.clone());
            }
            items.push(item.clone());
        }

        match self.server.add_cart_item(&item.to_request()).await {
            Ok(record) => {
                let mut items = self.lock_items();
                let added = items.iter_mut().find(|known| known.is_same_as(&item));
                match added {
                    Some(added) => {
                        added.set_id(Some(record.id().clone()));
                        info!(item_id = %record.id(), "Cart item added");
                        Ok(added.clone())
                    }
                    // Removed locally while the request was in flight
                    None => {
                        let mut confirmed = item;
                        confirmed.set_id(Some(record.id().clone()));
                        Ok(confirmed)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Adding cart item failed, rolling back");
                let mut items = self.lock_items();
                if let Some(index) = items
                    .iter()
                    .position(|known| known.is_same_as(&item) && known.id().is_none())
                {
                    items.remove(index);
                }
                Err(e)
            }
        }
    }

    /// Removes `item` right away, putting it back where it was if the server
    /// refuses
    #[instrument(skip(self, item))]
    pub async fn remove_item(&self, item: &CartItem) -> Result<(), AppError> {
        let (index, removed) = {
            let mut items = self.lock_items();
            let Some(index) = items.iter().position(|known| known.is_same_as(item)) else {
                debug!("Item not in cart");
                return Ok(());
            };
            (index, items.remove(index))
        };

        match self.server.remove_cart_item(&removed.to_request()).await {
            Ok(()) => {
                info!("Cart item removed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, index, "Removing cart item failed, restoring");
                let mut items = self.lock_items();
                let index = index.min(items.len());
                items.insert(index, removed);
                Err(e)
            }
        }
    }

    /// Checks out the cart.
    ///
    /// The resulting order lands in the order cache and the new token balance
    /// is merged into the signed-in user.
    #[instrument(skip(self))]
    pub async fn buy(&self) -> Result<Purchase, AppError> {
        let user_id = self
            .session
            .current_user()
            .ok_or_else(|| AppError::rejected("unauthenticated", "Sign in to check out"))?;

        let record = self.server.buy_cart_items().await?;
        self.lock_items().clear();

        for item in record.order.items.iter().flatten() {
            let mut game = Game::with_id(item.game_id.clone());
            game.owned = Some(true);
            game.in_cart = Some(false);
            self.games.update(game, false);
        }

        let mut user = User::with_id(user_id);
        user.token_balance = Some(record.token_balance);
        self.users.update(user, true);

        let order = self.orders.update(record.order, true);
        info!(
            order_id = %order.id(),
            token_balance = %record.token_balance,
            "Cart checked out"
        );

        Ok(Purchase {
            order,
            token_balance: record.token_balance,
        })
    }

    /// Sum of every item's price, computed exactly
    pub fn total(&self) -> Decimal {
        self.lock_items().iter().map(CartItem::price).sum()
    }

    pub fn has_item(&self, item: &CartItem) -> bool {
        self.lock_items().iter().any(|known| known.is_same_as(item))
    }

    pub fn has_game(&self, game_id: &EntityId) -> bool {
        self.lock_items().iter().any(|item| match item {
            CartItem::Game(item) => item.game.id() == *game_id,
            CartItem::Tokens(_) => false,
        })
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.lock_items().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Forgets the local cart without touching the server
    pub fn clear(&self) {
        self.lock_items().clear();
        self.loaded.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RemoteSource;
    use crate::server::InMemoryStoreServer;

    struct Fixture {
        server: Arc<InMemoryStoreServer>,
        games: Arc<GameRepository>,
        users: Arc<UserRepository>,
        orders: Arc<OrderRepository>,
        cart: Cart,
    }

    fn priced_game(id: &str, price: Decimal) -> Game {
        let mut game = Game::with_id(id);
        game.name = Some(format!("Game {}", id));
        game.price = Some(price);
        game
    }

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn fixture() -> Fixture {
        let mut me = User::with_id("me");
        me.token_balance = Some(Decimal::ZERO);
        let server = Arc::new(InMemoryStoreServer::new().with_current_user(me));
        server.insert_game(priced_game("1", Decimal::new(1010, 2)));
        server.insert_game(priced_game("2", Decimal::new(500, 2)));
        server.insert_game(priced_game("3", Decimal::new(2000, 2)));

        let session = Session::new();
        session.login(EntityId::new("me"));
        let source = Arc::new(RemoteSource::new(server.clone(), session.clone()));
        let games = Arc::new(GameRepository::new(source.clone()));
        let users = Arc::new(UserRepository::new(source.clone()));
        let orders = Arc::new(OrderRepository::new(server.clone(), source));
        let cart = Cart::new(
            server.clone(),
            session,
            games.clone(),
            users.clone(),
            orders.clone(),
        );

        Fixture {
            server,
            games,
            users,
            orders,
            cart,
        }
    }

    fn game_item(fixture: &Fixture, id: &str) -> CartItem {
        CartItem::game(fixture.games.update(Game::with_id(id), true))
    }

    fn ids(cart: &Cart) -> Vec<Option<EntityId>> {
        cart.items()
            .iter()
            .map(|item| match item {
                CartItem::Game(item) => Some(item.game.id()),
                CartItem::Tokens(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn add_stamps_server_id() {
        let f = fixture();

        let added = f.cart.add_item(game_item(&f, "1")).await.unwrap();

        assert!(added.id().is_some());
        assert_eq!(f.cart.items()[0].id(), added.id());
    }

    #[tokio::test]
    async fn adding_an_equivalent_item_is_a_noop() {
        let f = fixture();

        f.cart.add_item(game_item(&f, "1")).await.unwrap();
        f.cart.add_item(game_item(&f, "1")).await.unwrap();

        assert_eq!(f.cart.len(), 1);
        assert_eq!(f.server.call_count("add_cart_item"), 1);
    }

    #[tokio::test]
    async fn failed_add_rolls_back() {
        let f = fixture();
        f.server.fail_next(
            "add_cart_item",
            AppError::rejected("already_owned", "Game already owned"),
        );

        let result = f.cart.add_item(game_item(&f, "1")).await;

        assert!(matches!(result, Err(AppError::Rejected { kind, .. }) if kind == "already_owned"));
        assert!(f.cart.is_empty());
    }

    #[tokio::test]
    async fn failed_re_add_of_a_confirmed_item_rolls_back() {
        let f = fixture();
        let confirmed = f.cart.add_item(game_item(&f, "1")).await.unwrap();
        f.cart.remove_item(&confirmed).await.unwrap();
        f.server
            .fail_next("add_cart_item", AppError::Network("offline".to_string()));

        let result = f.cart.add_item(confirmed.clone()).await;

        assert!(result.is_err());
        assert!(f.cart.is_empty());
        assert!(!f.cart.has_item(&confirmed));
    }

    #[tokio::test]
    async fn re_added_item_gets_a_fresh_id() {
        let f = fixture();
        let first = f.cart.add_item(game_item(&f, "1")).await.unwrap();
        f.cart.remove_item(&first).await.unwrap();

        let second = f.cart.add_item(first.clone()).await.unwrap();

        assert!(second.id().is_some());
        assert_ne!(second.id(), first.id());
        assert_eq!(f.cart.items()[0].id(), second.id());
    }

    #[tokio::test]
    async fn failed_remove_restores_original_position() {
        let f = fixture();
        for id in ["1", "2", "3"] {
            f.cart.add_item(game_item(&f, id)).await.unwrap();
        }
        f.server
            .fail_next("remove_cart_item", AppError::Network("offline".to_string()));

        let result = f.cart.remove_item(&game_item(&f, "2")).await;

        assert!(result.is_err());
        assert_eq!(
            ids(&f.cart),
            vec![
                Some(EntityId::new("1")),
                Some(EntityId::new("2")),
                Some(EntityId::new("3"))
            ]
        );
    }

    #[tokio::test]
    async fn remove_deletes_locally_and_remotely() {
        let f = fixture();
        f.cart.add_item(game_item(&f, "1")).await.unwrap();

        f.cart.remove_item(&game_item(&f, "1")).await.unwrap();

        assert!(f.cart.is_empty());
        assert_eq!(f.server.cart_len(), 0);
    }

    #[tokio::test]
    async fn total_is_exact() {
        let f = fixture();
        f.games
            .load(&EntityId::new("1"), &attrs(&["price"]))
            .await
            .unwrap();

        f.cart.add_item(game_item(&f, "1")).await.unwrap();
        f.cart
            .add_item(CartItem::tokens(5, Decimal::new(1, 2)))
            .await
            .unwrap();

        assert_eq!(f.cart.total(), Decimal::new(1015, 2));
    }

    #[tokio::test]
    async fn total_of_two_games_is_exact() {
        let f = fixture();
        f.server.insert_game(priced_game("4", Decimal::new(5, 2)));
        f.games
            .fill(
                &[
                    f.games.update(Game::with_id("1"), true),
                    f.games.update(Game::with_id("4"), true),
                ],
                &attrs(&["price"]),
            )
            .await
            .unwrap();

        f.cart.add_item(game_item(&f, "1")).await.unwrap();
        f.cart.add_item(game_item(&f, "4")).await.unwrap();

        // 10.10 + 0.05
        assert_eq!(f.cart.total(), Decimal::new(1015, 2));
    }

    #[tokio::test]
    async fn second_load_only_fills_games() {
        let f = fixture();
        f.server
            .add_cart_item(&crate::server::CartItemRequest::Game {
                game_id: EntityId::new("1"),
            })
            .await
            .unwrap();

        f.cart.load(&attrs(&["name"]), false).await.unwrap();
        f.cart.load(&attrs(&["name", "price"]), false).await.unwrap();

        assert_eq!(f.server.call_count("get_cart"), 1);
        assert_eq!(f.server.call_count("get_games"), 1);
        assert_eq!(f.cart.total(), Decimal::new(1010, 2));
    }

    #[tokio::test]
    async fn forced_load_refetches() {
        let f = fixture();

        f.cart.load(&attrs(&["name"]), false).await.unwrap();
        f.cart.load(&attrs(&["name"]), true).await.unwrap();

        assert_eq!(f.server.call_count("get_cart"), 2);
        assert!(f.cart.is_loaded());
    }

    #[tokio::test]
    async fn buy_updates_orders_and_balance() {
        let f = fixture();
        f.cart.add_item(game_item(&f, "2")).await.unwrap();
        f.cart
            .add_item(CartItem::tokens(40, Decimal::new(1, 2)))
            .await
            .unwrap();

        let purchase = f.cart.buy().await.unwrap();

        assert!(f.cart.is_empty());
        assert_eq!(purchase.token_balance, Decimal::from(40));
        assert!(f
            .orders
            .retrieve(&purchase.order.id())
            .is_some_and(|order| order.ptr_eq(&purchase.order)));
        let me = f.users.retrieve(&EntityId::new("me")).unwrap();
        assert_eq!(me.read().token_balance, Some(Decimal::from(40)));
        let game = f.games.retrieve(&EntityId::new("2")).unwrap();
        assert_eq!(game.read().owned, Some(true));
    }

    #[tokio::test]
    async fn buy_requires_a_session() {
        let f = fixture();
        f.cart.session.logout();

        let result = f.cart.buy().await;

        assert!(matches!(result, Err(AppError::Rejected { kind, .. }) if kind == "unauthenticated"));
        assert_eq!(f.server.call_count("buy_cart_items"), 0);
    }

    #[tokio::test]
    async fn clear_resets_loaded_state() {
        let f = fixture();
        f.cart.load(&attrs(&["name"]), false).await.unwrap();
        f.cart.add_item(game_item(&f, "1")).await.unwrap();

        f.cart.clear();

        assert!(f.cart.is_empty());
        assert!(!f.cart.is_loaded());
    }
}
