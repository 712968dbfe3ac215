//! Upload modes and the photo size ceiling.

use serde::{Deserialize, Serialize};

/// Largest file, in bytes, that is sent through the photo upload path.
///
/// Telegram rejects photos above 5 MB; anything larger goes out as a
/// generic document.
pub const PHOTO_SIZE_THRESHOLD: u64 = 5 * 1024 * 1024;

/// How a file is attached to a chat reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    /// Compressed inline photo, subject to [`PHOTO_SIZE_THRESHOLD`]
    #[display("photo")]
    Photo,
    /// Generic document with a much higher size ceiling
    #[display("document")]
    Document,
}

impl UploadMode {
    /// Preferred mode for a file of `size_bytes`.
    pub fn for_size(size_bytes: u64) -> Self {
        if size_bytes > PHOTO_SIZE_THRESHOLD {
            Self::Document
        } else {
            Self::Photo
        }
    }
}
