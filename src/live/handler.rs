use async_trait::async_trait;
use thiserror::Error;

use super::events::PushEvent;
use crate::shared::AppError;

/// Errors that can occur when reacting to push events
#[derive(Debug, Error)]
pub enum LiveUpdateError {
    #[error("No user signed in")]
    NotAuthenticated,

    #[error("Refetch failed: {0}")]
    Refetch(#[from] AppError),
}

/// Trait for components that react to push events
///
/// Handlers are driven by a [`LiveSubscription`](super::LiveSubscription),
/// which only delivers events while a user is signed in.
#[async_trait]
pub trait PushEventHandler: Send + Sync {
    async fn handle_push_event(&self, event: PushEvent) -> Result<(), LiveUpdateError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
