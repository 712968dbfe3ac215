//! Content-addressed cache of remote media handles.
//!
//! Chat platforms hand back an opaque handle (Telegram's `file_id`) for every
//! upload. Re-sending that handle is free, re-uploading the bytes is not. This
//! crate remembers the handle for each file content so identical bytes are
//! uploaded once.
//!
//! - [`ContentDigest`] hashes file contents with SHA-256
//! - [`MediaHandleStore`] persists digest → handle records as JSON
//! - [`UploadMemoizer`] hashes, looks up, and uploads only on a miss
//!
//! # Example
//!
//! ```rust,no_run
//! use filebot_storage::{MediaHandleStore, RemoteHandle, UploadMemoizer};
//! use std::path::PathBuf;
//!
//! # async fn example() -> filebot_error::FilebotResult<()> {
//! let store = MediaHandleStore::load("tg_file_ids.json").await?;
//! let memoizer = UploadMemoizer::new(store);
//!
//! let upload = |path: PathBuf| async move {
//!     // Send `path` to the platform and return its handle
//!     Ok::<_, filebot_error::FilebotError>(RemoteHandle::from(format!(
//!         "handle-for-{}",
//!         path.display()
//!     )))
//! };
//!
//! let first = memoizer.upload_or_fetch("alice_trip.jpg", &upload).await?;
//! let second = memoizer.upload_or_fetch("alice_trip.jpg", &upload).await?;
//! assert!(second.is_cached());
//! assert_eq!(first.handle, second.handle);
//!
//! memoizer.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod handle;
mod hash;
mod memoizer;
mod store;

pub use filebot_error::{StorageError, StorageErrorKind};
pub use handle::RemoteHandle;
pub use hash::ContentDigest;
pub use memoizer::{HandleSource, Memoized, UploadMemoizer, Uploader};
pub use store::MediaHandleStore;
