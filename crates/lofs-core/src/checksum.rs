//! SHA-256 digests of fetched bundles, logged so a stale deployment can be
//! told apart from a wrong password.

use sha2::{Digest, Sha256};

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
