pub mod archive;
pub mod assets;
pub mod catalog;
pub mod checksum;
pub mod config;
pub mod control;
pub mod decrypt;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod normalize;
pub mod notes;
pub mod pipeline;
pub mod retry;
pub mod session;

#[cfg(test)]
mod test_support;

pub use catalog::NoteCatalog;
pub use error::PipelineError;
pub use fetch::{BundleFetcher, EncryptedBundle, FetchError, ProgressFn};
pub use notes::{InlineImage, Note, ResolvedNote};
pub use pipeline::{decode_bundle, NotesPipeline};
pub use session::{AuthState, Session};
