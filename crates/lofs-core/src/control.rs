//! Abort tokens for in-flight transfers.
//!
//! A transfer polls its token from curl's progress and write callbacks and
//! stops as soon as it is raised. The token is raised explicitly through
//! [`AbortToken::request_abort`] or implicitly when an armed [`AbortOnDrop`]
//! guard goes away together with the future that owned the transfer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Raw flag for code that only needs to poll.
    pub fn flag(&self) -> &AtomicBool {
        &self.0
    }

    /// Guard that raises this token when dropped, unless disarmed first.
    pub fn abort_on_drop(&self) -> AbortOnDrop {
        AbortOnDrop {
            token: Some(self.clone()),
        }
    }
}

#[derive(Debug)]
pub struct AbortOnDrop {
    token: Option<AbortToken>,
}

impl AbortOnDrop {
    /// The owner finished normally; dropping the guard no longer aborts.
    pub fn disarm(mut self) {
        self.token = None;
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.request_abort();
        }
    }
}
