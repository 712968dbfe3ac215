//! Error types for filebot.
//!
//! # Error Hierarchy
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! All of them convert into [`FilebotError`] with `?`.
//!
//! # Examples
//!
//! ```
//! use filebot_error::{FilebotResult, StorageError, StorageErrorKind};
//!
//! fn read_cache() -> FilebotResult<String> {
//!     Err(StorageError::new(StorageErrorKind::FileRead("cache.json".into())))?
//! }
//!
//! assert!(read_cache().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod library;
mod storage;
mod upload;

pub use config::ConfigError;
pub use error::{FilebotError, FilebotErrorKind, FilebotResult};
pub use library::LibraryError;
pub use storage::{StorageError, StorageErrorKind};
pub use upload::{UploadError, UploadErrorKind};
