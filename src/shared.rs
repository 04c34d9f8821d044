use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cart::Cart;
use crate::config::ClientConfig;
use crate::live::{
    AuthWatcher, LiveSubscription, NotificationsLiveUpdater, PushChannel, UserDataLiveUpdater,
};
use crate::repository::{
    FriendRequestRepository, GameRepository, NotificationRepository, OrderRepository,
    RemoteSource, UserRepository,
};
use crate::search::GameSearch;
use crate::server::StoreServer;
use crate::session::Session;

/// Errors surfaced by the caches, the cart and the server client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// The request never got an answer
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The server answered with an explicit error payload
    #[error("Rejected ({kind}): {message}")]
    Rejected {
        kind: String,
        message: String,
        code: Option<i64>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn rejected(kind: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Rejected {
            kind: kind.into(),
            message: message.into(),
            code: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::MalformedResponse(error.to_string())
    }
}

/// Wiring of every client-side component.
///
/// Components receive their collaborators explicitly; nothing is looked up by
/// name at runtime.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub server: Arc<dyn StoreServer>,
    pub session: Session,
    pub games: Arc<GameRepository>,
    pub users: Arc<UserRepository>,
    pub orders: Arc<OrderRepository>,
    pub friend_requests: Arc<FriendRequestRepository>,
    pub notifications: Arc<NotificationRepository>,
    pub cart: Arc<Cart>,
    pub game_search: Arc<GameSearch>,
    pub push_channel: PushChannel,
}

impl AppContext {
    pub fn new(config: ClientConfig, server: Arc<dyn StoreServer>) -> Self {
        let config = Arc::new(config);
        let session = Session::new();
        let source = Arc::new(RemoteSource::new(server.clone(), session.clone()));

        let games = Arc::new(GameRepository::new(source.clone()));
        let users = Arc::new(UserRepository::new(source.clone()));
        let orders = Arc::new(OrderRepository::new(server.clone(), source));
        let friend_requests = Arc::new(FriendRequestRepository::new(
            server.clone(),
            users.clone(),
        ));
        let notifications = Arc::new(NotificationRepository::new());
        let cart = Arc::new(Cart::new(
            server.clone(),
            session.clone(),
            games.clone(),
            users.clone(),
            orders.clone(),
        ));
        let game_search = Arc::new(GameSearch::new(
            games.clone(),
            config.presets.get("store.search", &["id", "name", "price"]),
        ));
        let push_channel = PushChannel::new(config.push_capacity);

        Self {
            config,
            server,
            session,
            games,
            users,
            orders,
            friend_requests,
            notifications,
            cart,
            game_search,
            push_channel,
        }
    }

    /// Starts the push listeners and the auth watcher.
    ///
    /// The tasks end once every clone of this context is dropped; abort the
    /// returned handles to stop them sooner.
    pub fn start_live_updates(&self) -> Vec<JoinHandle<()>> {
        let notifications_updater = NotificationsLiveUpdater::new(
            self.notifications.clone(),
            self.users.clone(),
        );
        let user_data_updater = UserDataLiveUpdater::new(
            self.session.clone(),
            self.users.clone(),
            self.friend_requests.clone(),
            self.config
                .presets
                .get("friends.requests", &["id", "username", "avatar"]),
        );

        let handles = vec![
            LiveSubscription::new(
                Arc::new(notifications_updater),
                self.push_channel.clone(),
                self.session.clone(),
            )
            .start(),
            LiveSubscription::new(
                Arc::new(user_data_updater),
                self.push_channel.clone(),
                self.session.clone(),
            )
            .start(),
            AuthWatcher::new(self.session.clone(), self.notifications.clone()).start(),
        ];

        info!(listeners = handles.len(), "Live updates started");
        handles
    }

    pub fn login(&self, user_id: impl Into<crate::entity::EntityId>) {
        self.session.login(user_id.into());
    }

    /// Ends the session and drops every cached entity so nothing leaks into
    /// the next one
    pub fn logout(&self) {
        self.session.logout();
        self.games.clear();
        self.users.clear();
        self.orders.clear();
        self.friend_requests.clear();
        self.notifications.clear();
        self.cart.clear();
        self.game_search.clear();
        info!("Session ended, caches cleared");
    }
}
