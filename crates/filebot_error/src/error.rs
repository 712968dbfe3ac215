//! Top-level error wrapper types.

use crate::{ConfigError, LibraryError, StorageError, UploadError};

/// Every error condition a filebot operation can report.
///
/// # Examples
///
/// ```
/// use filebot_error::{FilebotError, ConfigError};
///
/// let err: FilebotError = ConfigError::new("missing token").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FilebotErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Handle store or file I/O error
    #[from(StorageError)]
    Storage(StorageError),
    /// Upload failure reported by the chat transport
    #[from(UploadError)]
    Upload(UploadError),
    /// Library walk error
    #[from(LibraryError)]
    Library(LibraryError),
}

/// Filebot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Filebot Error: {}", _0)]
pub struct FilebotError(Box<FilebotErrorKind>);

impl FilebotError {
    /// Create a new error from a kind.
    pub fn new(kind: FilebotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FilebotErrorKind {
        &self.0
    }

    /// Whether this is an upload the platform refused because of its payload.
    ///
    /// Callers use this to fall back from photo to document uploads.
    pub fn is_upload_rejection(&self) -> bool {
        matches!(self.kind(), FilebotErrorKind::Upload(e) if e.kind.is_rejection())
    }
}

// Generic From implementation for any type that converts to FilebotErrorKind
impl<T> From<T> for FilebotError
where
    T: Into<FilebotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for filebot operations.
pub type FilebotResult<T> = std::result::Result<T, FilebotError>;
