//! Upload memoization keyed by content digest.

use crate::{ContentDigest, MediaHandleStore, RemoteHandle};
use filebot_error::FilebotResult;
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, instrument, warn};

/// Performs the real upload of a file and returns the platform's handle.
///
/// Implemented for any `Fn(PathBuf) -> impl Future<Output = FilebotResult<RemoteHandle>>`
/// closure, so callers can bind an upload mode and chat at the call site.
/// The returned future may borrow from the closure's environment.
pub trait Uploader: Send + Sync {
    /// Upload the file at `path`.
    ///
    /// Payload rejections should be reported as upload errors whose kind
    /// answers `is_rejection()`, so callers can retry in another mode.
    fn upload(&self, path: &Path) -> impl Future<Output = FilebotResult<RemoteHandle>> + Send;
}

impl<F, Fut> Uploader for F
where
    F: Fn(PathBuf) -> Fut + Send + Sync,
    Fut: Future<Output = FilebotResult<RemoteHandle>> + Send,
{
    fn upload(&self, path: &Path) -> impl Future<Output = FilebotResult<RemoteHandle>> + Send {
        (self)(path.to_path_buf())
    }
}

/// Where a memoized handle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum HandleSource {
    /// Found in the store, no upload performed
    #[display("cached")]
    Cached,
    /// Freshly uploaded and recorded
    #[display("uploaded")]
    Uploaded,
}

/// Result of [`UploadMemoizer::upload_or_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memoized {
    /// Digest of the file contents
    pub digest: ContentDigest,
    /// Handle to send to the chat
    pub handle: RemoteHandle,
    /// Whether the handle was cached or uploaded just now
    pub source: HandleSource,
}

impl Memoized {
    /// Whether the handle came from the store.
    ///
    /// A cached handle has not been sent anywhere yet by this call; the
    /// caller must still reply with it.
    pub fn is_cached(&self) -> bool {
        self.source == HandleSource::Cached
    }
}

/// Uploads each distinct file content once and reuses the handle afterwards.
///
/// The memoizer owns its [`MediaHandleStore`]. Concurrent calls for the same
/// digest are serialized so the store is consulted again after a concurrent
/// upload finishes; calls for different digests run in parallel. The store
/// lock is never held across an upload.
pub struct UploadMemoizer {
    store: AsyncMutex<MediaHandleStore>,
    gates: parking_lot::Mutex<HashMap<ContentDigest, Arc<AsyncMutex<()>>>>,
}

impl UploadMemoizer {
    /// Take ownership of `store`.
    pub fn new(store: MediaHandleStore) -> Self {
        debug!(records = store.len(), "Creating upload memoizer");
        Self {
            store: AsyncMutex::new(store),
            gates: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached handle for `path`'s contents, uploading on a miss.
    ///
    /// On a miss `uploader` runs exactly once and its handle is recorded
    /// before this returns. On a hit nothing is uploaded and the store is
    /// untouched.
    ///
    /// # Errors
    ///
    /// - hashing failures (file unreadable) propagate as storage errors
    /// - uploader errors propagate untouched; nothing is recorded
    ///
    /// A persistence failure after a successful upload is logged, not
    /// returned: the handle is cached in memory and written by the next
    /// flush, where a lasting failure surfaces (see [`shutdown`](Self::shutdown)).
    #[instrument(skip(self, path, uploader), fields(path = %path.as_ref().display(), digest = tracing::field::Empty))]
    pub async fn upload_or_fetch<U>(
        &self,
        path: impl AsRef<Path>,
        uploader: &U,
    ) -> FilebotResult<Memoized>
    where
        U: Uploader,
    {
        let path = path.as_ref();
        let digest = ContentDigest::from_file(path).await?;
        tracing::Span::current().record("digest", digest.short());

        let gate = self.gate(&digest);
        let result = {
            let _permit = gate.lock().await;
            self.fetch_or_upload(path, digest.clone(), uploader).await
        };
        self.release_gate(&digest, gate);
        result
    }

    async fn fetch_or_upload<U>(
        &self,
        path: &Path,
        digest: ContentDigest,
        uploader: &U,
    ) -> FilebotResult<Memoized>
    where
        U: Uploader,
    {
        if let Some(handle) = self.store.lock().await.get(&digest).cloned() {
            debug!(handle = %handle, "Found handle in cache");
            return Ok(Memoized {
                digest,
                handle,
                source: HandleSource::Cached,
            });
        }

        debug!("Cache miss, uploading");
        let handle = uploader.upload(path).await?;

        // The media already reached the chat; a failed write stays pending
        if let Err(e) = self
            .store
            .lock()
            .await
            .set(digest.clone(), handle.clone())
            .await
        {
            warn!(error = %e, handle = %handle, "Uploaded but could not persist handle");
        } else {
            info!(handle = %handle, "Uploaded and cached new content");
        }

        Ok(Memoized {
            digest,
            handle,
            source: HandleSource::Uploaded,
        })
    }

    fn gate(&self, digest: &ContentDigest) -> Arc<AsyncMutex<()>> {
        self.gates
            .lock()
            .entry(digest.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn release_gate(&self, digest: &ContentDigest, gate: Arc<AsyncMutex<()>>) {
        let mut gates = self.gates.lock();
        // The map and this caller hold the only references: nobody is waiting
        if Arc::strong_count(&gate) == 2 {
            gates.remove(digest);
        }
    }

    /// Cached handle for `path`'s contents without uploading.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn lookup(&self, path: impl AsRef<Path>) -> FilebotResult<Option<RemoteHandle>> {
        let digest = ContentDigest::from_file(path).await?;
        Ok(self.store.lock().await.get(&digest).cloned())
    }

    /// Snapshot of every record, sorted by digest.
    pub async fn records(&self) -> Vec<(ContentDigest, RemoteHandle)> {
        let store = self.store.lock().await;
        let mut records: Vec<_> = store
            .iter()
            .map(|(digest, handle)| (digest.clone(), handle.clone()))
            .collect();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }

    /// Number of cached handles.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Whether nothing is cached yet.
    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    /// Flush pending writes. Call once before the process exits.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> FilebotResult<()> {
        let mut store = self.store.lock().await;
        store.flush().await?;
        info!(records = store.len(), "Handle store flushed");
        Ok(())
    }
}
