//! Fixed-interval polling bounded by a wall-clock deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Call `probe` every `interval` until it returns `true` or `timeout` has
/// elapsed since the first call.
///
/// Time spent inside `probe` counts against the deadline. The first probe
/// runs immediately and no wait extends past the deadline. Returns `true` as
/// soon as a probe succeeds and `false` once the deadline is reached.
pub async fn poll_until<F, Fut>(interval: Duration, timeout: Duration, mut probe: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();
    while start.elapsed() < timeout {
        if probe().await {
            return true;
        }
        tokio::time::sleep(interval.min(timeout.saturating_sub(start.elapsed()))).await;
    }
    false
}
