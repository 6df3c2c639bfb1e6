//! Auth token issuance.
//!
//! An [`AuthRecord`] binds a user's display identity to an issuance
//! timestamp and a fresh CSPRNG nonce, sealed with a SHA-256 digest over
//! the canonical comma-joined form. The digest is what the external form
//! consumes; the audit log keeps the full record for later verification.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Nonce length in bytes (32 hex chars once encoded).
const NONCE_LEN: usize = 16;

/// One issued authentication attempt.
///
/// The digest is always derived from the other four fields at
/// construction and cannot be set independently. Records are created
/// fresh per triggering event, written once to the audit log, and then
/// dropped; nothing caches or invalidates them.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRecord {
    username: String,
    userid: u64,
    timestamp: f64,
    nonce: String,
    digest: String,
}

impl AuthRecord {
    fn new(username: String, userid: u64, timestamp: f64, nonce: String) -> Self {
        let mut record = Self {
            username,
            userid,
            timestamp,
            nonce,
            digest: String::new(),
        };
        record.digest = sha256_hex(record.hash_input().as_bytes());
        record
    }

    /// Data string the digest is computed over:
    /// `<username>,<userid>,<timestamp>,<nonce>`
    pub fn hash_input(&self) -> String {
        format!(
            "{},{},{},{}",
            self.username, self.userid, self.timestamp, self.nonce
        )
    }

    /// Data string plus digest, as written to the auth log:
    /// `<username>,<userid>,<timestamp>,<nonce>,<digest>`
    pub fn audit_line(&self) -> String {
        format!("{},{}", self.hash_input(), self.digest)
    }

    /// Display identity at issuance time (owned by the platform).
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Stable platform-assigned identifier.
    pub fn userid(&self) -> u64 {
        self.userid
    }

    /// Issuance time, seconds since the Unix epoch.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// 16 random bytes as lowercase hex.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// SHA-256 hex digest over [`AuthRecord::hash_input`].
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

/// Issues fresh [`AuthRecord`]s.
///
/// Stateless; every call draws new entropy. A failed read from the OS
/// random source aborts rather than degrading to weak randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Issue a token for the given identity, captured at the current
    /// instant.
    ///
    /// The same four non-digest fields always produce the same digest;
    /// two calls at the same instant with the same identity still differ
    /// because the nonce is fresh.
    pub fn issue(&self, username: &str, userid: u64) -> AuthRecord {
        debug_assert!(!username.is_empty());
        debug_assert!(userid > 0);

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before the Unix epoch")
            .as_secs_f64();

        let mut nonce = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        AuthRecord::new(username.to_string(), userid, timestamp, hex_lower(&nonce))
    }
}

// Encode as lowercase hex chars (using format! instead of the hex crate).
fn hex_lower(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
