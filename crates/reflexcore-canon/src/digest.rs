//! Truncated SHA-256 content hashing over canonical JSON bytes.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonicalize::{canonicalize, CanonError};

/// Length, in hex characters, of a content hash: 128 bits, 16 bytes.
pub const GOAL_KEY_HEX_LEN: usize = 32;

/// Hashes `value`'s canonical form with SHA-256, truncated to the
/// first 16 bytes (128 bits), and returns it as lowercase hex.
///
/// # Errors
///
/// Returns [`CanonError`] if `value` cannot be canonicalized.
pub fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, CanonError> {
    let bytes = canonicalize(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();
    Ok(hex_encode(&digest[..16]))
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
