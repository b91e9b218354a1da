//! CLI command handlers, one file per command.

mod fetch;
mod show;
mod unlock;

pub use fetch::run_fetch;
pub use show::run_show;
pub use unlock::run_unlock;

use anyhow::{anyhow, Context, Result};
use lofs_core::config::LofsConfig;
use lofs_core::error::INVALID_PASSWORD_MESSAGE;
use lofs_core::{
    decode_bundle, BundleFetcher, NoteCatalog, NotesPipeline, PipelineError, ProgressFn, Session,
};
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::cli::password::read_password;

/// Progress sink that redraws one stderr line.
pub(crate) fn progress_line() -> ProgressFn {
    Arc::new(|pct| {
        eprint!("\r  downloading bundle {:>3}%", pct);
        if pct == 100 {
            eprintln!();
        }
        let _ = std::io::stderr().flush();
    })
}

/// Prompts for the password and decodes the bundle from `file` or the network.
/// Failures reach the user as the generic message only; details are logged.
pub(crate) async fn load_catalog(cfg: &LofsConfig, file: Option<&Path>) -> Result<NoteCatalog> {
    let password = read_password()?;
    if password.expose_secret().is_empty() {
        return Err(anyhow!(INVALID_PASSWORD_MESSAGE));
    }
    let result = match file {
        Some(path) => {
            let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
            decode_bundle(&bytes, &password).map(NoteCatalog::new)
        }
        None => unlock_remote(cfg, &password).await,
    };
    result.map_err(|e| {
        tracing::error!("unlock failed: {}", e);
        anyhow!(e.user_message())
    })
}

async fn unlock_remote(
    cfg: &LofsConfig,
    password: &SecretString,
) -> Result<NoteCatalog, PipelineError> {
    let fetcher = BundleFetcher::from_config(cfg)?;
    let mut session = Session::new(NotesPipeline::new(Arc::new(fetcher)));
    session.login(password, Some(progress_line())).await?;
    Ok(session.catalog().cloned().unwrap_or_default())
}
