//! Pipeline-level outcome classes and the stage-error collapse rules.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::decrypt::DecryptError;
use crate::fetch::FetchError;

/// Shown for every credential-class failure.
pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password";
/// Shown for network and data-integrity failures.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load data";

/// Single failure result of a pipeline run.
///
/// `Display` carries developer detail for logs; end users only ever see
/// [`user_message`](Self::user_message).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The bundle could not be downloaded. Retrying may help.
    #[error("network failure: {0}")]
    NetworkFailure(#[source] FetchError),
    /// Wrong password or corrupt ciphertext; deliberately not told apart.
    #[error("invalid credentials ({stage})")]
    InvalidCredentials { stage: &'static str },
    /// The archive opened but its metadata is unusable. No password fixes this.
    #[error("metadata invalid: {0}")]
    MetadataInvalid(#[source] ArchiveError),
}

impl PipelineError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::InvalidCredentials { .. } => INVALID_PASSWORD_MESSAGE,
            PipelineError::NetworkFailure(_) | PipelineError::MetadataInvalid(_) => {
                LOAD_FAILED_MESSAGE
            }
        }
    }

    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, PipelineError::InvalidCredentials { .. })
    }

    /// Whether the same request can succeed later without a different password.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::NetworkFailure(_))
    }
}

impl From<FetchError> for PipelineError {
    fn from(e: FetchError) -> Self {
        PipelineError::NetworkFailure(e)
    }
}

impl From<DecryptError> for PipelineError {
    fn from(_: DecryptError) -> Self {
        PipelineError::InvalidCredentials { stage: "decrypt" }
    }
}

impl From<ArchiveError> for PipelineError {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::MalformedArchive(_) => PipelineError::InvalidCredentials { stage: "archive" },
            ArchiveError::MetadataMissing(_) | ArchiveError::MetadataInvalid(_) => {
                PipelineError::MetadataInvalid(e)
            }
        }
    }
}
