//! ContentDigest: lowercase hex SHA-256 of a file's bytes.
//!
//! Only the bytes are hashed. Two files with identical contents share a
//! digest no matter where they live or what they are called.

use filebot_error::{FilebotResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::io::AsyncReadExt;

const DIGEST_HEX_LEN: usize = 64;
const READ_CHUNK: usize = 64 * 1024;

/// SHA-256 digest of file contents, 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Hash an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hash the full contents of the file at `path`.
    ///
    /// The file is streamed in fixed-size chunks, so large videos are never
    /// held in memory at once.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::FileRead`] if the file cannot be opened or
    /// read.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn from_file(path: impl AsRef<Path>) -> FilebotResult<Self> {
        let path = path.as_ref();
        let read_error = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        };

        let mut file = tokio::fs::File::open(path).await.map_err(read_error)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; READ_CHUNK];
        let mut total = 0usize;

        loop {
            let read = file.read(&mut buffer).await.map_err(read_error)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
            total += read;
        }

        let digest = Self(format!("{:x}", hasher.finalize()));
        tracing::debug!(digest = %digest, bytes = total, "Hashed file contents");
        Ok(digest)
    }

    /// Parse a digest string, validating length and hex characters.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.len() != DIGEST_HEX_LEN || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StorageError::new(StorageErrorKind::InvalidDigest(
                s.to_string(),
            )));
        }
        Ok(Self(s.to_lowercase()))
    }

    /// Get the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First characters of the digest, for log lines and listings.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentDigest {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
