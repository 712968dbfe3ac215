//! Upload error types.

/// Kinds of upload failures reported by a chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UploadErrorKind {
    /// Payload exceeds the size ceiling of the chosen upload mode
    #[display("Payload too large: {} bytes", _0)]
    PayloadTooLarge(u64),
    /// Platform refused the payload (malformed image, bad dimensions, ...)
    #[display("Upload rejected: {}", _0)]
    BadRequest(String),
    /// Network or platform failure unrelated to the payload
    #[display("Transport failure: {}", _0)]
    Transport(String),
}

impl UploadErrorKind {
    /// Whether the platform rejected the payload itself.
    ///
    /// Rejections are worth retrying in a different upload mode; transport
    /// failures are not.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::PayloadTooLarge(_) | Self::BadRequest(_))
    }
}

/// Upload error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upload Error: {} at line {} in {}", kind, line, file)]
pub struct UploadError {
    /// The kind of error that occurred
    pub kind: UploadErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UploadError {
    /// Create a new upload error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UploadErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &UploadErrorKind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_retryable() {
        assert!(UploadErrorKind::PayloadTooLarge(10).is_rejection());
        assert!(UploadErrorKind::BadRequest("PHOTO_INVALID_DIMENSIONS".into()).is_rejection());
        assert!(!UploadErrorKind::Transport("timeout".into()).is_rejection());
    }
}
