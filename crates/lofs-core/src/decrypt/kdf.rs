//! OpenSSL `EVP_BytesToKey` with MD5 and a single iteration.
//!
//! This is the derivation CryptoJS applies to a passphrase: MD5 blocks
//! `D_i = MD5(D_{i-1} || password || salt)` are chained until 48 bytes
//! exist, the first 32 become the AES-256 key and the next 16 the CBC IV.

use md5::{Digest, Md5};
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;

/// Key (`[..KEY_LEN]`) followed by IV (`[KEY_LEN..]`), wiped on drop.
pub type KeyMaterial = Zeroizing<[u8; KEY_LEN + IV_LEN]>;

pub fn evp_bytes_to_key(password: &[u8], salt: &[u8]) -> KeyMaterial {
    let mut out: KeyMaterial = Zeroizing::new([0u8; KEY_LEN + IV_LEN]);
    let mut filled = 0;
    let mut prev: Option<Zeroizing<Vec<u8>>> = None;
    while filled < out.len() {
        let mut hasher = Md5::new();
        if let Some(prev) = &prev {
            hasher.update(prev.as_slice());
        }
        hasher.update(password);
        hasher.update(salt);
        let block = Zeroizing::new(hasher.finalize().to_vec());
        let take = (out.len() - filled).min(block.len());
        out[filled..filled + take].copy_from_slice(&block[..take]);
        filled += take;
        prev = Some(block);
    }
    out
}
