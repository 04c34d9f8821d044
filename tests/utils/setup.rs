use std::sync::Arc;
use tokio::task::JoinHandle;

use storefront_sync::{
    models::{Game, User},
    AppContext, ClientConfig, EntityId, InMemoryStoreServer,
};

use super::fixtures::{game, user};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub server: Arc<InMemoryStoreServer>,
    pub context: AppContext,
    pub me: EntityId,
    pub _live_updates: Vec<JoinHandle<()>>,
}

pub struct TestSetupBuilder {
    games: Vec<Game>,
    users: Vec<User>,
    signed_in: bool,
    live_updates: bool,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            games: vec![],
            users: vec![],
            signed_in: true,
            live_updates: false,
        }
    }

    pub fn with_games(mut self, games: Vec<Game>) -> Self {
        self.games.extend(games);
        self
    }

    /// Three games, two of them matching "quest"
    pub fn with_catalog(self) -> Self {
        self.with_games(vec![
            game("g-1", "Quest for Glory", 1010),
            game("g-2", "Quest Beyond", 2000),
            game("g-3", "Tiny Racers", 999),
        ])
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_friend_kit(self) -> Self {
        self.with_user(user("kit", "kit"))
    }

    pub fn signed_out(mut self) -> Self {
        self.signed_in = false;
        self
    }

    pub fn with_live_updates(mut self) -> Self {
        self.live_updates = true;
        self
    }

    pub async fn build(self) -> TestSetup {
        let me = EntityId::new("me");
        let server = Arc::new(InMemoryStoreServer::new().with_current_user(user("me", "ash")));
        for game in self.games {
            server.insert_game(game);
        }
        for user in self.users {
            server.insert_user(user);
        }

        let context = AppContext::new(ClientConfig::default(), server.clone());
        let live_updates = if self.live_updates {
            context.start_live_updates()
        } else {
            Vec::new()
        };

        if self.signed_in {
            context.login(me.clone());
        }

        TestSetup {
            server,
            context,
            me,
            _live_updates: live_updates,
        }
    }
}
