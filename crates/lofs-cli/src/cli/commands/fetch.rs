//! `lofs fetch` – download the bundle and print its size and digest.

use anyhow::{anyhow, Result};
use lofs_core::config::LofsConfig;
use lofs_core::error::LOAD_FAILED_MESSAGE;
use lofs_core::BundleFetcher;

use super::progress_line;

pub async fn run_fetch(cfg: &LofsConfig) -> Result<()> {
    let fetcher = BundleFetcher::from_config(cfg)?;
    let bundle = fetcher.fetch(Some(progress_line())).await.map_err(|e| {
        tracing::error!(url = %fetcher.url(), "fetch failed: {}", e);
        anyhow!(LOAD_FAILED_MESSAGE)
    })?;
    println!("{}  {} bytes  {}", bundle.digest(), bundle.len(), fetcher.url());
    Ok(())
}
