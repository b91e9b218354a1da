//! The full retrieval pipeline: fetch -> decrypt -> extract -> resolve -> normalize.

use std::sync::Arc;

use secrecy::SecretString;

use crate::archive::{self, ArchiveError};
use crate::assets;
use crate::decrypt;
use crate::error::PipelineError;
use crate::fetch::{BundleFetcher, ProgressFn};
use crate::normalize::normalize;
use crate::notes::ResolvedNote;

/// Runs stages 2-5 on a bundle that is already in memory.
///
/// Every credential-class failure comes back as
/// [`PipelineError::InvalidCredentials`], whichever stage noticed it.
pub fn decode_bundle(
    ciphertext: &[u8],
    password: &SecretString,
) -> Result<Vec<ResolvedNote>, PipelineError> {
    let plaintext = decrypt::decrypt(ciphertext, password).map_err(|e| {
        tracing::debug!("decrypt rejected bundle: {}", e);
        PipelineError::from(e)
    })?;

    let extracted = archive::extract(&plaintext).map_err(|e| {
        match &e {
            ArchiveError::MalformedArchive(detail) => {
                tracing::debug!("decrypted text is not an archive: {}", detail)
            }
            other => tracing::error!("bundle metadata unusable: {}", other),
        }
        PipelineError::from(e)
    })?;
    drop(plaintext);

    let resolved = assets::resolve(extracted.notes, &extracted.entries);
    let notes = normalize(resolved);
    tracing::info!(notes = notes.len(), "bundle decoded");
    Ok(notes)
}

/// Pipeline bound to a shared single-flight fetcher.
///
/// Cheap to clone. Concurrent runs with different passwords share the
/// downloaded bundle and nothing else.
#[derive(Clone)]
pub struct NotesPipeline {
    fetcher: Arc<BundleFetcher>,
}

impl NotesPipeline {
    pub fn new(fetcher: Arc<BundleFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Arc<BundleFetcher> {
        &self.fetcher
    }

    /// Fetches (or reuses) the bundle and decodes it with `password`.
    pub async fn run(
        &self,
        password: &SecretString,
        progress: Option<ProgressFn>,
    ) -> Result<Vec<ResolvedNote>, PipelineError> {
        let bundle = self.fetcher.fetch(progress).await?;
        decode_bundle(bundle.as_bytes(), password)
    }
}
