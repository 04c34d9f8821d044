// Public API - what other modules can use
pub use friend_request::{FriendRequest, FriendRequestRecord, RequestDirection};
pub use game::Game;
pub use notification::{Notification, NotificationKind};
pub use order::{Order, OrderItem, OrderType};
pub use user::User;

// Internal modules
pub mod friend_request;
mod game;
mod notification;
mod order;
mod user;
