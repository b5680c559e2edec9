//! SHA-256 digests of file bytes.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Digest of a file's bytes, stored in the `hash` column.
///
/// Always 64 lowercase hex characters. Build folders are named after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    hex: String,
}

/// Errors when parsing a content hash from a hex string.
#[derive(Debug, Error)]
pub enum ContentHashError {
    #[error("invalid hex string: expected 64 lowercase hex characters, got {0} characters")]
    InvalidLength(usize),

    #[error("invalid hex character at position {position}: '{character}'")]
    InvalidCharacter { position: usize, character: char },
}

impl ContentHash {
    /// Hashes an in-memory buffer.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::from_digest(hasher)
    }

    /// Computes a SHA256 hash of a file's bytes without loading it whole.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened or read.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(Self::from_digest(hasher))
    }

    fn from_digest(hasher: Sha256) -> Self {
        let hex = format!("{:x}", hasher.finalize());
        Self { hex }
    }

    /// Parses a stored digest, lowercasing it.
    ///
    /// # Errors
    ///
    /// `InvalidLength` unless `hex` has 64 characters, `InvalidCharacter` on
    /// the first non-hex character.
    pub fn from_hex(hex: &str) -> Result<Self, ContentHashError> {
        if hex.len() != 64 {
            return Err(ContentHashError::InvalidLength(hex.len()));
        }

        for (i, c) in hex.chars().enumerate() {
            if !c.is_ascii_hexdigit() {
                return Err(ContentHashError::InvalidCharacter {
                    position: i,
                    character: c,
                });
            }
        }

        Ok(Self {
            hex: hex.to_ascii_lowercase(),
        })
    }

    /// Returns the hash as a 64-character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Consumes the hash, returning the hex string.
    pub fn into_string(self) -> String {
        self.hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}
