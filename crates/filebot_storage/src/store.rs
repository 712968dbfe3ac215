//! Persistent digest → handle store.
//!
//! The whole mapping lives in memory and is written to a single JSON object
//! on disk:
//!
//! ```json
//! {
//!   "3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b": "AgACAgQAAxkDAAI..."
//! }
//! ```
//!
//! Writes replace the file atomically (temp file + rename). A file that
//! cannot be decoded is moved aside to `<path>.corrupt` and the store starts
//! empty; losing the cache only costs re-uploads.

use crate::{ContentDigest, RemoteHandle};
use filebot_error::{FilebotResult, StorageError, StorageErrorKind};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Digest → handle records with write-through persistence.
///
/// At most one record exists per digest; [`set`](Self::set) overwrites.
#[derive(Debug)]
pub struct MediaHandleStore {
    path: Option<PathBuf>,
    records: HashMap<ContentDigest, RemoteHandle>,
    auto_flush: bool,
    dirty: bool,
    read_only: bool,
}

impl MediaHandleStore {
    /// Load the store persisted at `path`.
    ///
    /// A missing file yields an empty store. A corrupt file (not JSON, not
    /// UTF-8, or not an object) is logged, renamed to `<path>.corrupt`, and
    /// also yields an empty store. Records whose key is not a valid digest
    /// or whose value is not a string are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::FileRead`] when the file exists but cannot
    /// be read (permissions, I/O failure).
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> FilebotResult<Self> {
        Self::open(path.as_ref(), false).await
    }

    /// Load the store at `path` for inspection only.
    ///
    /// Never writes: a corrupt file stays where it is and
    /// [`flush`](Self::flush) is a no-op.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load_read_only(path: impl AsRef<Path>) -> FilebotResult<Self> {
        Self::open(path.as_ref(), true).await
    }

    async fn open(path: &Path, read_only: bool) -> FilebotResult<Self> {
        let mut store = Self {
            path: Some(path.to_path_buf()),
            records: HashMap::new(),
            auto_flush: !read_only,
            dirty: false,
            read_only,
        };

        let contents = match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No handle store on disk, starting empty");
                return Ok(store);
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        match Self::decode(&contents) {
            Ok(records) => {
                store.records = records;
                info!(records = store.records.len(), "Loaded handle store");
            }
            Err(e) if read_only => {
                warn!(error = %e, "Handle store is corrupt, showing an empty cache");
            }
            Err(e) => {
                warn!(error = %e, "Handle store is corrupt, starting with an empty cache");
                let backup = corrupt_backup_path(path);
                if let Err(e) = tokio::fs::rename(path, &backup).await {
                    warn!(error = %e, backup = %backup.display(), "Could not move corrupt store aside");
                }
            }
        }

        Ok(store)
    }

    /// In-memory store that never touches disk.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            records: HashMap::new(),
            auto_flush: false,
            dirty: false,
            read_only: false,
        }
    }

    /// Enable or disable flushing after every [`set`](Self::set).
    ///
    /// With auto-flush off, call [`flush`](Self::flush) before exit.
    pub fn with_auto_flush(mut self, enabled: bool) -> Self {
        self.auto_flush = enabled;
        self
    }

    fn decode(contents: &[u8]) -> Result<HashMap<ContentDigest, RemoteHandle>, StorageError> {
        let document: JsonValue = serde_json::from_slice(contents)
            .map_err(|e| StorageError::new(StorageErrorKind::Corrupt(e.to_string())))?;

        let JsonValue::Object(entries) = document else {
            return Err(StorageError::new(StorageErrorKind::Corrupt(
                "expected a JSON object at top level".to_string(),
            )));
        };

        let mut records = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let Ok(digest) = ContentDigest::parse(&key) else {
                warn!(key = %key, "Skipping record with malformed digest");
                continue;
            };
            let JsonValue::String(handle) = value else {
                warn!(key = %key, "Skipping record with non-string handle");
                continue;
            };
            records.insert(digest, RemoteHandle::from(handle));
        }
        Ok(records)
    }

    /// Cached handle for `digest`, if any.
    pub fn get(&self, digest: &ContentDigest) -> Option<&RemoteHandle> {
        self.records.get(digest)
    }

    /// Insert or overwrite the record for `digest`.
    ///
    /// With auto-flush enabled the record is on disk when this returns.
    #[instrument(skip(self, handle), fields(digest = %digest.short()))]
    pub async fn set(&mut self, digest: ContentDigest, handle: RemoteHandle) -> FilebotResult<()> {
        if let Some(previous) = self.records.insert(digest, handle) {
            debug!(previous = %previous, "Overwrote existing handle");
        }
        self.dirty = true;

        if self.auto_flush {
            self.flush().await?;
        }
        Ok(())
    }

    /// Write pending changes to disk.
    ///
    /// No-op for ephemeral and read-only stores and when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::DirectoryCreation`] or
    /// [`StorageErrorKind::FileWrite`] on I/O failure; the changes stay
    /// pending and the next flush retries them.
    #[instrument(skip(self), fields(records = self.records.len()))]
    pub async fn flush(&mut self) -> FilebotResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty || self.read_only {
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Sorted keys keep the file diffable
        let sorted: BTreeMap<&str, &str> = self
            .records
            .iter()
            .map(|(digest, handle)| (digest.as_str(), handle.as_str()))
            .collect();
        let encoded = serde_json::to_vec_pretty(&sorted).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "encode {}: {}",
                path.display(),
                e
            )))
        })?;

        let temp_path = sibling_path(path, ".tmp");
        tokio::fs::write(&temp_path, &encoded).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        self.dirty = false;
        debug!(path = %path.display(), "Flushed handle store");
        Ok(())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContentDigest, &RemoteHandle)> {
        self.records.iter()
    }

    /// Backing file, `None` for ephemeral stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether changes are waiting for a flush.
    pub fn has_pending_writes(&self) -> bool {
        self.dirty
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    sibling_path(path, ".corrupt")
}
