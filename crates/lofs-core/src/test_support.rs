//! Builders for bundles in the producer's format, used by unit tests.

use std::io::{Cursor, Write};

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use zip::{write::FileOptions, CompressionMethod};

use crate::decrypt::{evp_bytes_to_key, KEY_LEN, SALT_MAGIC};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// ZIP container holding `files` in order.
pub(crate) fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Archive plaintext as the producer emits it: base64 of the ZIP.
pub(crate) fn archive_text(files: &[(&str, &[u8])]) -> String {
    STANDARD.encode(zip_bytes(files))
}

/// Salted AES-256-CBC envelope of `text`, base64 encoded.
pub(crate) fn seal(text: &str, password: &str) -> String {
    let salt = [0x5a_u8; 8];
    let material = evp_bytes_to_key(password.as_bytes(), &salt);
    let ct = Aes256CbcEnc::new_from_slices(&material[..KEY_LEN], &material[KEY_LEN..])
        .unwrap()
        .encrypt_padded_vec_mut::<Pkcs7>(text.as_bytes());
    let mut raw = SALT_MAGIC.to_vec();
    raw.extend_from_slice(&salt);
    raw.extend_from_slice(&ct);
    STANDARD.encode(raw)
}

pub(crate) const SCENARIO_NOTES: &str = r#"{"notes":[
    {"id":"1","date":"2024-01-01","text":"a","imageUrl":"x.png"},
    {"id":"2","date":"2023-12-31","text":"b"}
]}"#;

pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";
