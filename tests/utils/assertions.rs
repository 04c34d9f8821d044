use std::time::Duration;
use tokio::time::{sleep, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(5);
const TIMEOUT: Duration = Duration::from_secs(2);

/// Polls `condition` until it holds, giving background tasks time to run.
/// Returns false if it never does within the timeout.
#[allow(dead_code)]
pub async fn eventually<F>(condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(POLL_INTERVAL).await;
    }
    condition()
}

/// Lets spawned subscriptions drain what has been published so far
#[allow(dead_code)]
pub async fn settle() {
    sleep(Duration::from_millis(50)).await;
}
