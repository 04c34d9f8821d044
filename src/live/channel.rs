use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::events::RawPushEvent;
use crate::shared::AppError;

/// Fan-out of push frames to every live subscription
#[derive(Debug, Clone)]
pub struct PushChannel {
    sender: broadcast::Sender<RawPushEvent>,
}

impl PushChannel {
    /// Creates a channel buffering up to `capacity` frames per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Delivers a frame, returning how many subscribers received it
    pub fn publish(&self, event: RawPushEvent) -> usize {
        let event_type = event.event_type.clone();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event_type = %event_type, receivers, "Push event published");
                receivers
            }
            Err(_) => {
                debug!(event_type = %event_type, "Push event published with no receivers");
                0
            }
        }
    }

    /// Parses a JSON text frame and publishes it
    pub fn publish_json(&self, frame: &str) -> Result<usize, AppError> {
        let event: RawPushEvent = serde_json::from_str(frame)?;
        Ok(self.publish(event))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RawPushEvent> {
        self.sender.subscribe()
    }

    /// Forwards text frames from a push connector until it ends.
    ///
    /// Connector errors and malformed frames are logged and skipped. Returns
    /// the number of frames published.
    pub async fn pump<S>(&self, frames: S) -> usize
    where
        S: Stream<Item = Result<String, AppError>>,
    {
        let mut frames = std::pin::pin!(frames);
        let mut forwarded = 0;

        while let Some(frame) = frames.next().await {
            match frame.and_then(|text| self.publish_json(&text)) {
                Ok(_) => forwarded += 1,
                Err(e) => warn!(error = %e, "Skipping push frame"),
            }
        }

        info!(forwarded, "Push stream ended");
        forwarded
    }
}
