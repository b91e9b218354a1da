use thiserror::Error;

/// Why the bundle transfer did not produce a body.
///
/// `Clone` so one failed transfer can be handed to every caller that waited on it.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// libcurl reported a failure (timeout, connection, TLS, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// The transfer was aborted by its owner.
    #[error("transfer cancelled")]
    Cancelled,
    /// The blocking transfer task died before returning.
    #[error("transfer task failed: {0}")]
    Join(String),
    #[error("invalid bundle URL: {0}")]
    InvalidUrl(String),
}
