//! Retry and backoff policy for the bundle transfer.
//!
//! Classifies transfer failures (timeouts, throttling, connection drops,
//! server errors) and decides whether and when to try again, so the fetcher
//! only has to run the loop.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{FailureKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
