//! Archive extractor: base64 text -> ZIP container -> metadata + named entries.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::config::METADATA_ENTRY;
use crate::notes::{Note, NotesDocument};

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Not base64, not a ZIP, or an entry could not be inflated. After a
    /// successful decrypt this almost always means the password was wrong.
    #[error("malformed archive: {0}")]
    MalformedArchive(String),
    #[error("archive has no {0} entry")]
    MetadataMissing(&'static str),
    #[error("metadata document is invalid: {0}")]
    MetadataInvalid(#[source] serde_json::Error),
}

/// Contents of a decrypted bundle.
#[derive(Debug, Default)]
pub struct ExtractedArchive {
    pub notes: Vec<Note>,
    /// Every other file entry, keyed by its full name inside the archive.
    pub entries: HashMap<String, Vec<u8>>,
}

/// Opens the archive encoded in `plaintext` and parses its metadata document.
pub fn extract(plaintext: &str) -> Result<ExtractedArchive, ArchiveError> {
    let raw = STANDARD
        .decode(plaintext.trim())
        .map_err(|e| ArchiveError::MalformedArchive(format!("base64: {}", e)))?;
    let mut zip = zip::ZipArchive::new(Cursor::new(raw))
        .map_err(|e| ArchiveError::MalformedArchive(e.to_string()))?;

    let mut entries = HashMap::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut file = zip
            .by_index(index)
            .map_err(|e| ArchiveError::MalformedArchive(format!("entry {}: {}", index, e)))?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| ArchiveError::MalformedArchive(format!("{}: {}", name, e)))?;
        entries.insert(name, data);
    }

    let metadata = entries
        .remove(METADATA_ENTRY)
        .ok_or(ArchiveError::MetadataMissing(METADATA_ENTRY))?;
    let notes = serde_json::from_slice::<NotesDocument>(&metadata)
        .map_err(ArchiveError::MetadataInvalid)?
        .into_notes();

    tracing::debug!(notes = notes.len(), assets = entries.len(), "archive extracted");
    Ok(ExtractedArchive { notes, entries })
}
