//! Content hashing for cache validation
//!
//! A file's cache record is only reused when the SHA-1 of its current bytes
//! matches the hash stored alongside the record.

use sha1::{Digest, Sha1};

/// Compute the content hash of a byte slice
///
/// Returns the empty string when caching is disabled; no stored record can
/// exist in that mode, so the sentinel never produces a match.
pub fn content_hash(content: &[u8], enabled: bool) -> String {
    if !enabled {
        return String::new();
    }
    let mut hasher = Sha1::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
