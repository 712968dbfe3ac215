//! File library primitives for filebot.
//!
//! - [`locate`] finds files under a library root whose names contain every
//!   query token
//! - [`pick_one`] selects one match through an injected randomness source
//! - [`UploadMode`] and [`PHOTO_SIZE_THRESHOLD`] decide how a file is sent
//! - [`LibraryStats`] summarizes the library for the `/stats` command

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod locate;
mod mode;
mod select;
mod stats;

pub use locate::{SearchResult, locate, normalize_query};
pub use mode::{PHOTO_SIZE_THRESHOLD, UploadMode};
pub use select::pick_one;
pub use stats::LibraryStats;
