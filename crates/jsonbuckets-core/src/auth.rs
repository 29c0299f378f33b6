//! API key generation and hashing for user credentials.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::UserId;

/// A registered user identity as persisted in the credential store.
///
/// Users are created out of band (via the `keygen` utility); the core treats
/// this record as read-only. Only the hash of the API key is kept; the
/// plaintext is shown once at generation time and never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique, immutable user identifier.
    pub user_id: UserId,

    /// SHA-256 hex digest of the user's API key.
    pub api_key_hash: String,

    /// When the user was registered.
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a record for a freshly generated key hash.
    #[must_use]
    pub fn new(api_key_hash: String) -> Self {
        Self {
            user_id: UserId::new(),
            api_key_hash,
            created_at: Utc::now(),
        }
    }
}

/// Generates a new API key with 32 random bytes.
/// Returns the key in format: "bk_" + hex-encoded 32 bytes (64 hex characters).
#[must_use]
pub fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let mut key_bytes = [0u8; 32];
    rng.fill(&mut key_bytes);
    format!("bk_{}", hex::encode(key_bytes))
}

/// Hashes an API key using SHA-256.
/// Returns the hex-encoded hash suitable for storage and point lookup.
#[must_use]
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}
