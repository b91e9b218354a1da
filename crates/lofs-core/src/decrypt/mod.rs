//! Symmetric decryptor for the bundle's password envelope.
//!
//! The bundle is the base64 text of an OpenSSL-style salted envelope:
//! `"Salted__" || salt[8] || AES-256-CBC(PKCS#7)`. Key and IV come from the
//! password through [`kdf::evp_bytes_to_key`]. There is no authentication
//! tag, so a wrong password is only noticed through bad padding or a
//! plaintext that is not UTF-8; occasionally garbage slips through and the
//! archive stage has to reject it.

mod kdf;

pub use kdf::{evp_bytes_to_key, KeyMaterial, IV_LEN, KEY_LEN};

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Magic prefix of a salted envelope.
pub const SALT_MAGIC: &[u8; 8] = b"Salted__";
pub const SALT_LEN: usize = 8;
const BLOCK_LEN: usize = 16;

/// Decrypted text, wiped on drop.
pub type Plaintext = Zeroizing<String>;

#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("ciphertext is empty")]
    Empty,
    #[error("ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("ciphertext has no salt header")]
    MissingSalt,
    #[error("wrong password or corrupt ciphertext")]
    WrongPasswordOrCorrupt,
}

/// Decrypts the text-encoded envelope in `ciphertext` with `password`.
pub fn decrypt(ciphertext: &[u8], password: &SecretString) -> Result<Plaintext, DecryptError> {
    let text = ciphertext.trim_ascii();
    if text.is_empty() {
        return Err(DecryptError::Empty);
    }
    let raw = STANDARD.decode(text)?;
    if raw.len() < SALT_MAGIC.len() + SALT_LEN || !raw.starts_with(SALT_MAGIC) {
        return Err(DecryptError::MissingSalt);
    }
    let (salt, body) = raw[SALT_MAGIC.len()..].split_at(SALT_LEN);
    if body.is_empty() || body.len() % BLOCK_LEN != 0 {
        return Err(DecryptError::WrongPasswordOrCorrupt);
    }

    let material = evp_bytes_to_key(password.expose_secret().as_bytes(), salt);
    let cipher = Aes256CbcDec::new_from_slices(&material[..KEY_LEN], &material[KEY_LEN..])
        .map_err(|_| DecryptError::WrongPasswordOrCorrupt)?;

    let mut buf = Zeroizing::new(body.to_vec());
    let len = cipher
        .decrypt_padded_mut::<Pkcs7>(buf.as_mut_slice())
        .map_err(|_| DecryptError::WrongPasswordOrCorrupt)?
        .len();
    if len == 0 {
        return Err(DecryptError::WrongPasswordOrCorrupt);
    }
    buf.truncate(len);

    match String::from_utf8(std::mem::take(&mut *buf)) {
        Ok(s) => Ok(Zeroizing::new(s)),
        Err(e) => {
            e.into_bytes().zeroize();
            Err(DecryptError::WrongPasswordOrCorrupt)
        }
    }
}
