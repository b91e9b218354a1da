//! Transport fetcher: downloads the encrypted bundle once per fetcher.
//!
//! [`BundleFetcher`] is the process-scoped single-flight cache. The first
//! caller starts the transfer, concurrent callers await that same transfer
//! and receive its result (success or failure), and later callers get the
//! cached bundle. A failed or cancelled transfer leaves the cache empty, so
//! the next call goes back to the network.

mod error;
mod headers;
mod progress;
mod transfer;

pub use error::FetchError;
pub use progress::ProgressFn;
pub use transfer::TransferOptions;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};

use crate::checksum;
use crate::config::LofsConfig;
use crate::control::AbortToken;
use crate::retry::{run_with_retry, RetryPolicy};
use progress::ProgressTracker;

/// Ciphertext exactly as served: base64 text of the salted AES envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBundle {
    bytes: Vec<u8>,
}

impl EncryptedBundle {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 of the served bytes, lowercase hex.
    pub fn digest(&self) -> String {
        checksum::sha256_hex(&self.bytes)
    }
}

type TransferResult = Result<Arc<EncryptedBundle>, FetchError>;
type SharedTransfer = Shared<BoxFuture<'static, TransferResult>>;

/// State of the single-flight slot.
enum Slot {
    Idle,
    /// Held weakly: once every caller has dropped its handle the transfer
    /// future is dropped too, which aborts the GET.
    InFlight {
        id: u64,
        transfer: WeakShared<BoxFuture<'static, TransferResult>>,
        abort: AbortToken,
    },
    Ready(Arc<EncryptedBundle>),
}

/// Single-flight fetcher for one bundle URL.
///
/// Share it behind an `Arc`; every clone of the `Arc` sees the same cache.
pub struct BundleFetcher {
    url: String,
    options: TransferOptions,
    retry: RetryPolicy,
    slot: Mutex<Slot>,
    next_id: AtomicU64,
}

impl BundleFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: TransferOptions::default(),
            retry: RetryPolicy::default(),
            slot: Mutex::new(Slot::Idle),
            next_id: AtomicU64::new(0),
        }
    }

    /// Fetcher for the configured origin's bundle path, with its curl and retry settings.
    pub fn from_config(cfg: &LofsConfig) -> Result<Self, FetchError> {
        let url = cfg
            .bundle_url()
            .map_err(|e| FetchError::InvalidUrl(format!("{:#}", e)))?;
        Ok(Self::new(url)
            .with_options(TransferOptions::from(cfg))
            .with_retry(cfg.retry_policy()))
    }

    pub fn with_options(mut self, options: TransferOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// True once a transfer has completed successfully.
    pub fn is_cached(&self) -> bool {
        matches!(*self.lock_slot(), Slot::Ready(_))
    }

    /// Returns the bundle, downloading it if no transfer has succeeded yet.
    ///
    /// `progress` receives non-decreasing percentages ending with 100, on
    /// success and on failure alike. Callers that join a transfer started by
    /// someone else (or hit the cache) only see the final 100, and get the
    /// same result as the caller that started it.
    pub async fn fetch(&self, progress: Option<ProgressFn>) -> TransferResult {
        let (transfer, id, started_here) = {
            let mut slot = self.lock_slot();
            match self.join_or_start(&mut slot, &progress) {
                Ok(joined) => joined,
                Err(cached) => {
                    drop(slot);
                    report_done(&progress);
                    return Ok(cached);
                }
            }
        };

        let result = transfer.await;

        {
            let mut slot = self.lock_slot();
            // Only the transfer that is still current may settle the slot.
            if matches!(&*slot, Slot::InFlight { id: current, .. } if *current == id) {
                *slot = match &result {
                    Ok(bundle) => Slot::Ready(Arc::clone(bundle)),
                    Err(_) => Slot::Idle,
                };
            }
        }
        if !started_here {
            report_done(&progress);
        }
        result
    }

    /// Aborts the transfer currently in flight, if any. Every caller waiting
    /// on it gets [`FetchError::Cancelled`]; nothing is cached.
    pub fn cancel(&self) {
        if let Slot::InFlight { abort, .. } = &*self.lock_slot() {
            tracing::info!(url = %self.url, "cancelling bundle transfer");
            abort.request_abort();
        }
    }

    /// The cached bundle as `Err`, or the transfer to await (joined or new).
    fn join_or_start(
        &self,
        slot: &mut Slot,
        progress: &Option<ProgressFn>,
    ) -> Result<(SharedTransfer, u64, bool), Arc<EncryptedBundle>> {
        match slot {
            Slot::Ready(bundle) => return Err(Arc::clone(bundle)),
            Slot::InFlight { id, transfer, .. } => {
                if let Some(shared) = transfer.upgrade() {
                    return Ok((shared, *id, false));
                }
                // Every earlier caller went away; that transfer is aborting.
            }
            Slot::Idle => {}
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let abort = AbortToken::new();
        let shared = run_transfer(
            self.url.clone(),
            self.options.clone(),
            self.retry,
            abort.clone(),
            progress.clone(),
        )
        .boxed()
        .shared();
        *slot = match shared.downgrade() {
            Some(weak) => Slot::InFlight {
                id,
                transfer: weak,
                abort,
            },
            None => Slot::Idle,
        };
        Ok((shared, id, true))
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn report_done(progress: &Option<ProgressFn>) {
    if let Some(sink) = progress {
        sink(100);
    }
}

async fn run_transfer(
    url: String,
    options: TransferOptions,
    retry: RetryPolicy,
    token: AbortToken,
    progress: Option<ProgressFn>,
) -> TransferResult {
    // Dropping this future (every waiting caller went away) aborts the GET.
    let drop_guard = token.abort_on_drop();
    let started = Instant::now();
    tracing::debug!(url = %url, "starting bundle transfer");

    let blocking_url = url.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let tracker = ProgressTracker::new(progress);
        let res = run_with_retry(&retry, token.flag(), |attempt| {
            if attempt > 1 {
                tracing::info!(attempt, "retrying bundle transfer");
            }
            transfer::get(&blocking_url, &options, token.flag(), &tracker)
        });
        tracker.finish();
        res
    })
    .await;
    drop_guard.disarm();

    let body = match joined {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            tracing::warn!(url = %url, "bundle transfer failed: {}", e);
            return Err(e);
        }
        Err(e) => {
            tracing::error!(url = %url, "bundle transfer task failed: {}", e);
            return Err(FetchError::Join(e.to_string()));
        }
    };

    let bundle = EncryptedBundle::new(body);
    tracing::debug!(
        bytes = bundle.len(),
        sha256 = %bundle.digest(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "bundle fetched"
    );
    Ok(Arc::new(bundle))
}
