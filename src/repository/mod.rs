// Client-side caches
//
// Each repository owns the canonical instances of one entity type; everything
// else holds handles into it.

// Public API - what other modules can use
pub use cache::{GameRepository, Repository, UserRepository};
pub use friend_request::FriendRequestRepository;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use source::{EntitySource, RemoteSource};

// Internal modules
mod cache;
mod friend_request;
mod notification;
mod order;
mod source;
