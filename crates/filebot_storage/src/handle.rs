//! Platform-issued media handles.

use serde::{Deserialize, Serialize};

/// Opaque token the chat platform returns for uploaded content.
///
/// Sending the handle instead of the bytes re-shares the same media without
/// another upload.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RemoteHandle(String);

impl RemoteHandle {
    /// Get the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for RemoteHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for RemoteHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
