//! Async testing utilities
//!
//! Helpers measure time with `tokio::time`, so they behave the same under
//! `#[tokio::test(start_paused = true)]` as on a real clock.

use std::time::Duration;

use tokio::sync::watch;

/// Wait until a published snapshot satisfies `predicate` and return a clone
/// of it.
///
/// Returns `None` on timeout or when the sender side was dropped.
pub async fn wait_for_state<T, F>(
    rx: &mut watch::Receiver<T>,
    timeout: Duration,
    mut predicate: F,
) -> Option<T>
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    match tokio::time::timeout(timeout, rx.wait_for(|value| predicate(value))).await {
        Ok(Ok(value)) => Some((*value).clone()),
        _ => None,
    }
}
