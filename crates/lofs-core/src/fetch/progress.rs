//! Percent-complete reporting for the bundle transfer.

use std::cell::Cell;
use std::sync::Arc;

/// Progress sink: receives percentages in `0..=100`.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Turns byte counts into non-decreasing percentages for a [`ProgressFn`].
///
/// Values are only forwarded when they grow, so a retried transfer never
/// reports less than an earlier attempt did. [`finish`](Self::finish) always
/// ends the sequence on exactly 100.
pub(crate) struct ProgressTracker {
    sink: Option<ProgressFn>,
    last: Cell<Option<u8>>,
}

impl ProgressTracker {
    pub fn new(sink: Option<ProgressFn>) -> Self {
        Self {
            sink,
            last: Cell::new(None),
        }
    }

    /// `received` bytes so far out of `total`; unknown totals report nothing.
    pub fn received(&self, received: u64, total: Option<u64>) {
        let Some(total) = total.filter(|&t| t > 0) else {
            return;
        };
        let pct = (u128::from(received) * 100 / u128::from(total)).min(100) as u8;
        self.emit(pct);
    }

    /// Transfer is over, successfully or not.
    pub fn finish(&self) {
        self.emit(100);
    }

    fn emit(&self, pct: u8) {
        if self.last.get().is_some_and(|last| pct <= last) {
            return;
        }
        self.last.set(Some(pct));
        if let Some(sink) = &self.sink {
            sink(pct);
        }
    }
}
