//! Token generation.

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a hash in hex characters.
pub const HASH_LEN: usize = 32;

/// Generate a fresh token for an element.
///
/// SHA-256 over 32 random bytes, the salt, the element name and the current
/// time in nanoseconds; the first 16 digest bytes are hex-encoded, giving
/// `HASH_LEN` lowercase hex characters.
pub fn generate_hash(salt: &str, name: &str) -> String {
    let mut rng = rand::thread_rng();
    let nonce: [u8; 32] = rng.r#gen();
    let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(salt.as_bytes());
    hasher.update([0u8]);
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(now.to_le_bytes());
    let digest = hasher.finalize();

    hex::encode(&digest[..HASH_LEN / 2])
}
