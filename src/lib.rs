// Library crate for the storefront client sync layer
// This file exposes the public API for integration tests

pub mod cart;
pub mod config;
pub mod entity;
pub mod live;
pub mod models;
pub mod repository;
pub mod search;
pub mod server;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use cart::{Cart, CartItem, Purchase};
pub use config::{AttributePresets, ClientConfig};
pub use entity::{Entity, EntityId, EntityRef};
pub use live::{PushChannel, PushEvent, RawPushEvent};
pub use repository::{
    FriendRequestRepository, GameRepository, NotificationRepository, OrderRepository,
    Repository, UserRepository,
};
pub use search::{GameSearch, SearchOutcome};
pub use server::{InMemoryStoreServer, StoreServer};
pub use session::Session;
pub use shared::{AppContext, AppError};
