//! Builds bundles the way the publishing side does: ZIP, base64, then a
//! salted AES-256-CBC envelope, base64 again.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lofs_core::decrypt::{evp_bytes_to_key, KEY_LEN, SALT_MAGIC};
use zip::{write::FileOptions, CompressionMethod};

pub const PASSWORD: &str = "correct horse";

pub const NOTES_JSON: &str = r#"{"notes":[
    {"id":"1","date":"2024-01-01","text":"New year","imageUrl":"x.png"},
    {"id":"2","date":"2023-12-31","text":"Last day"}
]}"#;

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nintegration-png";

pub fn seal_files(files: &[(&str, &[u8])], password: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    let archive = zip.finish().unwrap().into_inner();
    seal(&STANDARD.encode(archive), password)
}

pub fn seal(text: &str, password: &str) -> Vec<u8> {
    let salt = *b"lofstest";
    let material = evp_bytes_to_key(password.as_bytes(), &salt);
    let ct = cbc::Encryptor::<aes::Aes256>::new_from_slices(&material[..KEY_LEN], &material[KEY_LEN..])
        .unwrap()
        .encrypt_padded_vec_mut::<Pkcs7>(text.as_bytes());
    let mut raw = SALT_MAGIC.to_vec();
    raw.extend_from_slice(&salt);
    raw.extend_from_slice(&ct);
    STANDARD.encode(raw).into_bytes()
}

/// The two-note scenario bundle, with `x.png` present.
pub fn scenario_bundle() -> Vec<u8> {
    seal_files(
        &[("notes.json", NOTES_JSON.as_bytes()), ("images/x.png", PNG_BYTES)],
        PASSWORD,
    )
}
