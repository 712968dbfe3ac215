//! Errors raised while walking the file library.

/// The library root could not be walked.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Library Error: {}: {} at line {} in {}", root, message, line, file)]
pub struct LibraryError {
    /// Library root that failed
    pub root: String,
    /// Underlying failure
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl LibraryError {
    /// Create a new library error for `root` at the current location.
    #[track_caller]
    pub fn new(root: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            root: root.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
