//! Retry loop: run a transfer attempt until success or the policy gives up.

use std::sync::atomic::{AtomicBool, Ordering};

use super::classify::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::fetch::FetchError;

/// Runs `attempt` until it succeeds, the policy gives up, or `abort` is raised.
/// Blocks the current thread while backing off; call from `spawn_blocking`.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, abort: &AtomicBool, mut attempt: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Result<T, FetchError>,
{
    let mut n = 1u32;
    loop {
        let err = match attempt(n) {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        match policy.decide(n, classify(&err)) {
            RetryDecision::GiveUp => return Err(err),
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(attempt = n, ?delay, "bundle transfer failed, retrying: {}", err);
                std::thread::sleep(delay);
                if abort.load(Ordering::Relaxed) {
                    return Err(FetchError::Cancelled);
                }
                n += 1;
            }
        }
    }
}
