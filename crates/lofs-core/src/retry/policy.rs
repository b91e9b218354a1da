use std::time::Duration;

/// Coarse classification of a failed transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connect or transfer timed out.
    Timeout,
    /// Server asked us to back off (429, 503).
    Throttled,
    /// DNS, connect, reset and similar network-level failures.
    Connection,
    /// Other 5xx responses.
    ServerError(u16),
    /// Anything a second attempt cannot fix (4xx, cancellation).
    Fatal,
}

impl FailureKind {
    pub fn is_transient(self) -> bool {
        !matches!(self, FailureKind::Fatal)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Give up and surface the failure.
    GiveUp,
    /// Try again after the given delay.
    RetryAfter(Duration),
}

/// Capped exponential backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `attempt` is 1-based and names the attempt that just failed.
    pub fn decide(&self, attempt: u32, kind: FailureKind) -> RetryDecision {
        if attempt >= self.max_attempts || !kind.is_transient() {
            return RetryDecision::GiveUp;
        }
        let shift = attempt.saturating_sub(1).min(8);
        let delay = self.base_delay.saturating_mul(1u32 << shift);
        RetryDecision::RetryAfter(delay.min(self.max_delay))
    }
}
