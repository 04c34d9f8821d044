use rust_decimal::Decimal;

use storefront_sync::models::{Game, User};

#[allow(dead_code)]
pub fn game(id: &str, name: &str, cents: i64) -> Game {
    let mut game = Game::with_id(id);
    game.name = Some(name.to_string());
    game.description = Some(format!("{} description", name));
    game.price = Some(Decimal::new(cents, 2));
    game.tags = Some(vec!["indie".to_string()]);
    game
}

#[allow(dead_code)]
pub fn user(id: &str, username: &str) -> User {
    let mut user = User::with_id(id);
    user.username = Some(username.to_string());
    user.avatar = Some(format!("https://cdn.example.com/{}.png", id));
    user.token_balance = Some(Decimal::ZERO);
    user.friends = Some(Vec::new());
    user
}

#[allow(dead_code)]
pub fn attrs(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
