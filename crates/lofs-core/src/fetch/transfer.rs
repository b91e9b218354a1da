//! One HTTP GET of the bundle through libcurl.

use std::cell::{Cell, RefCell};
use std::str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::headers::parse_size_headers;
use super::progress::ProgressTracker;
use super::FetchError;
use crate::config::LofsConfig;

/// libcurl knobs for the bundle GET.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    /// Abort when throughput stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub timeout: Option<Duration>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            timeout: None,
        }
    }
}

impl From<&LofsConfig> for TransferOptions {
    fn from(cfg: &LofsConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(cfg.low_speed_time_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Downloads `url` into memory, feeding `progress` as body bytes arrive.
/// Blocks the current thread; call from `spawn_blocking` if used from async code.
pub(crate) fn get(
    url: &str,
    opts: &TransferOptions,
    abort: &AtomicBool,
    progress: &ProgressTracker,
) -> Result<Vec<u8>, FetchError> {
    let body: RefCell<Vec<u8>> = RefCell::new(Vec::new());
    let header_lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
    // Resolved on the first body chunk, once the final response's headers are in.
    let total: Cell<Option<Option<u64>>> = Cell::new(None);

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    // Empty string = every encoding libcurl was built with; bodies arrive decoded.
    easy.accept_encoding("")?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    if let Some(timeout) = opts.timeout {
        easy.timeout(timeout)?;
    }
    easy.progress(true)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                let line = line.trim_end();
                let mut lines = header_lines.borrow_mut();
                // New status line: a redirect or 1xx came first, start over.
                if line.starts_with("HTTP/") {
                    lines.clear();
                    total.set(None);
                }
                lines.push(line.to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            if abort.load(Ordering::Relaxed) {
                return Ok(0);
            }
            let known = match total.get() {
                Some(known) => known,
                None => {
                    let known = parse_size_headers(&header_lines.borrow()).advertised_total();
                    total.set(Some(known));
                    known
                }
            };
            let mut buf = body.borrow_mut();
            buf.extend_from_slice(data);
            progress.received(buf.len() as u64, known);
            Ok(data.len())
        })?;
        transfer.progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if abort.load(Ordering::Relaxed) {
            return Err(FetchError::Cancelled);
        }
        return Err(FetchError::Curl(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(body.into_inner())
}
