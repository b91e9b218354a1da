//! Record types shared by the pipeline stages.

use serde::{Deserialize, Serialize};

/// One record as listed in the archive's metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    /// Calendar date, normally `YYYY-MM-DD`.
    pub date: String,
    pub text: String,
    /// Relative asset name below `images/` in the archive.
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

/// Shapes accepted for the metadata document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NotesDocument {
    Wrapped { notes: Vec<Note> },
    Bare(Vec<Note>),
}

impl NotesDocument {
    pub fn into_notes(self) -> Vec<Note> {
        match self {
            NotesDocument::Wrapped { notes } | NotesDocument::Bare(notes) => notes,
        }
    }
}

/// An image asset inlined as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

/// A record whose image reference has been resolved (or dropped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNote {
    pub id: String,
    pub date: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

impl ResolvedNote {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
