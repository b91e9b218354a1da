//! Asset resolver: swaps each note's image reference for an inline data URL.
//!
//! A reference that has no matching `images/<name>` entry is dropped with a
//! warning; it never fails the pipeline.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::config::IMAGE_PREFIX;
use crate::notes::{InlineImage, Note, ResolvedNote};

const DEFAULT_MIME: &str = "image/jpeg";

/// MIME type for an image file name, from its extension.
/// Unknown or missing extensions fall back to JPEG.
pub fn mime_for(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MIME,
    };
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => DEFAULT_MIME,
    }
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Only plain relative names may address archive entries.
fn is_relative_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("://")
        && !name.starts_with('/')
        && !name.starts_with("data:")
        && !name.split('/').any(|part| part == "..")
}

fn resolve_one(note: Note, entries: &HashMap<String, Vec<u8>>) -> ResolvedNote {
    let image = note.image_ref.as_deref().and_then(|name| {
        let found = is_relative_name(name)
            .then(|| entries.get(&format!("{}{}", IMAGE_PREFIX, name)))
            .flatten();
        match found {
            Some(bytes) => {
                let mime = mime_for(name);
                Some(InlineImage {
                    mime_type: mime.to_string(),
                    data_url: data_url(mime, bytes),
                })
            }
            None => {
                tracing::warn!(note = %note.id, image = %name, "image not found in archive");
                None
            }
        }
    });
    ResolvedNote {
        id: note.id,
        date: note.date,
        text: note.text,
        image,
    }
}

/// Resolves every note's image against the archive `entries`, keeping note order.
pub fn resolve(notes: Vec<Note>, entries: &HashMap<String, Vec<u8>>) -> Vec<ResolvedNote> {
    notes
        .into_iter()
        .map(|note| resolve_one(note, entries))
        .collect()
}
