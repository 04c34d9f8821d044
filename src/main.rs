use chrono::NaiveDate;
use futures::stream;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use storefront_sync::models::{Game, User};
use storefront_sync::{AppContext, AppError, CartItem, ClientConfig, EntityId, InMemoryStoreServer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storefront sync session");

    if let Err(e) = run().await {
        error!(error = %e, "Session failed");
        std::process::exit(1);
    }
}

fn game(id: &str, name: &str, cents: i64, released: Option<NaiveDate>) -> Game {
    let mut game = Game::with_id(id);
    game.name = Some(name.to_string());
    game.price = Some(Decimal::new(cents, 2));
    game.developer = Some("Northwind Studio".to_string());
    game.release_date = released;
    game
}

fn user(id: &str, username: &str) -> User {
    let mut user = User::with_id(id);
    user.username = Some(username.to_string());
    user.token_balance = Some(Decimal::ZERO);
    user.friends = Some(Vec::new());
    user
}

fn seeded_server() -> InMemoryStoreServer {
    let server = InMemoryStoreServer::new().with_current_user(user("player-1", "ash"));
    server.insert_user(user("player-2", "kit"));
    server.insert_game(game("g-1", "Quest for Glory", 1999, NaiveDate::from_ymd_opt(2019, 3, 14)));
    server.insert_game(game("g-2", "Quest Beyond", 2999, NaiveDate::from_ymd_opt(2021, 6, 2)));
    server.insert_game(game("g-3", "Tiny Racers", 999, NaiveDate::from_ymd_opt(2022, 11, 30)));
    server
}

async fn run() -> Result<(), AppError> {
    let config = ClientConfig::new()?;
    let server = Arc::new(seeded_server());
    let context = AppContext::new(config, server.clone());
    let live_updates = context.start_live_updates();

    let me = EntityId::new("player-1");
    context.login(me.clone());

    context.game_search.search("quest", 1).await?;
    for game in context.game_search.results() {
        context.cart.add_item(CartItem::game(game)).await?;
    }
    context
        .cart
        .add_item(CartItem::tokens(500, Decimal::new(1, 2)))
        .await?;
    info!(items = context.cart.len(), total = %context.cart.total(), "Cart ready");

    let purchase = context.cart.buy().await?;
    info!(
        order_id = %purchase.order.id(),
        token_balance = %purchase.token_balance,
        "Checkout complete"
    );

    // Push traffic for a token transfer from another user
    server.credit_tokens(&me, Decimal::from(25))?;
    let frames = stream::iter(vec![Ok(json!({
        "type": "token_received",
        "data": { "amount": 25, "user": { "id": "player-2", "username": "kit" } }
    })
    .to_string())]);
    context.push_channel.pump(frames).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let balance = context
        .users
        .retrieve(&me)
        .and_then(|user| user.snapshot().token_balance);
    info!(
        unread = context.notifications.unread_count(),
        token_balance = ?balance,
        "Live updates applied"
    );

    let history = context
        .orders
        .load_page(
            &context.config.presets.get("orders.list", &["id", "total"]),
            1,
            context.config.page_size,
            None,
        )
        .await?;
    info!(orders = history.entries.len(), "Order history loaded");

    context.logout();
    for handle in live_updates {
        handle.abort();
    }
    Ok(())
}
