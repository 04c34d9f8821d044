// Live updates pushed by the store backend
//
// Raw frames fan out through the push channel; each subscription decodes them
// and hands them to one handler while a user is signed in.

// Public API - what other modules can use
pub use auth_watcher::AuthWatcher;
pub use channel::PushChannel;
pub use events::{
    FriendshipAccepted, FriendshipReceived, PushEvent, PushEventType, RawPushEvent, TokenReceived,
};
pub use handler::{LiveUpdateError, PushEventHandler};
pub use notifications::NotificationsLiveUpdater;
pub use subscription::LiveSubscription;
pub use user_data::UserDataLiveUpdater;

// Internal modules
mod auth_watcher;
mod channel;
mod events;
mod handler;
mod notifications;
mod subscription;
mod user_data;
