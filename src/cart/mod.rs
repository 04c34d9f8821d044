// Shopping cart with optimistic add/remove and checkout

// Public API - what other modules can use
pub use items::{CartItem, GameItem, TokenItem};
pub use service::{Cart, Purchase};

// Internal modules
mod items;
mod service;
