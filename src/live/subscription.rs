use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::channel::PushChannel;
use super::events::PushEvent;
use super::handler::PushEventHandler;
use crate::session::Session;

/// Routes push events to a handler while a user is signed in
pub struct LiveSubscription {
    handler: Arc<dyn PushEventHandler>,
    channel: PushChannel,
    session: Session,
}

impl LiveSubscription {
    pub fn new(handler: Arc<dyn PushEventHandler>, channel: PushChannel, session: Session) -> Self {
        Self {
            handler,
            channel,
            session,
        }
    }

    /// Start the subscription - spawns a background task that listens to push
    /// events and routes them to the handler.
    ///
    /// The receiver is registered before this returns, so events published
    /// afterwards are never missed. The task ends once every clone of the
    /// channel is dropped.
    pub fn start(self) -> JoinHandle<()> {
        let Self {
            handler,
            channel,
            session,
        } = self;
        let handler_name = handler.handler_name();

        info!(handler = handler_name, "Starting live subscription");
        let mut receiver = channel.subscribe();
        drop(channel);

        tokio::spawn(async move {
            loop {
                let raw = match receiver.recv().await {
                    Ok(raw) => raw,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(handler = handler_name, skipped, "Live subscription lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if !session.is_authenticated() {
                    debug!(
                        handler = handler_name,
                        event_type = %raw.event_type,
                        "Signed out, dropping push event"
                    );
                    continue;
                }

                let event = match PushEvent::decode(&raw) {
                    Ok(Some(event)) => event,
                    Ok(None) => {
                        debug!(event_type = %raw.event_type, "Ignoring unknown push event");
                        continue;
                    }
                    Err(e) => {
                        warn!(
                            handler = handler_name,
                            event_type = %raw.event_type,
                            error = %e,
                            "Malformed push event"
                        );
                        continue;
                    }
                };

                let event_type = event.event_type();
                if let Err(e) = handler.handle_push_event(event).await {
                    warn!(
                        handler = handler_name,
                        event_type = %event_type,
                        error = %e,
                        "Push event handler failed"
                    );
                }
            }

            info!(handler = handler_name, "Live subscription ended");
        })
    }
}
