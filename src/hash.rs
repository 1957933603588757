//! BLAKE3 hashing utilities for downloaded snapshots

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Content hash of a downloaded archive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Bare hex digest, used as the extraction directory name
    pub fn hex(&self) -> &str {
        &self.0
    }

    /// Prefixed form for display and logs
    pub fn prefixed(&self) -> String {
        format!("{}{}", HASH_PREFIX, self.0)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefixed())
    }
}

/// Calculate BLAKE3 hash of an in-memory buffer
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    ContentHash(blake3::hash(bytes).to_hex().to_string())
}
