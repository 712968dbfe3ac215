//! Shared test fixtures: a recording chat transport.

#![allow(dead_code)]

use async_trait::async_trait;
use filebot_error::{FilebotResult, UploadError, UploadErrorKind};
use filebot_social::{ChatAction, ChatTransport, IncomingCommand, InputFile, TextFormat};
use filebot_storage::RemoteHandle;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Everything the transport was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Action(ChatAction),
    Text(String, TextFormat),
    Photo(InputFile, String),
    Document(InputFile, String),
}

/// Transport that records calls and issues sequential handles.
#[derive(Default)]
pub struct MockTransport {
    events: Mutex<Vec<Event>>,
    reject_photos: bool,
    fail_text: bool,
    next_handle: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every photo upload as too large.
    pub fn rejecting_photos() -> Self {
        Self {
            reject_photos: true,
            ..Self::default()
        }
    }

    /// Fail every text reply with a transport error.
    pub fn failing_text() -> Self {
        Self {
            fail_text: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Text(text, _) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Photo uploads of local files (cached re-sends excluded).
    pub fn photo_uploads(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Photo(InputFile::Path(_), _)))
            .count()
    }

    /// Document uploads of local files (cached re-sends excluded).
    pub fn document_uploads(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Document(InputFile::Path(_), _)))
            .count()
    }

    /// Replies that re-sent a cached handle.
    pub fn cached_sends(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    Event::Photo(InputFile::Handle(_), _) | Event::Document(InputFile::Handle(_), _)
                )
            })
            .count()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn handle_for(&self, prefix: &str, file: &InputFile) -> RemoteHandle {
        match file {
            InputFile::Handle(handle) => handle.clone(),
            InputFile::Path(_) => {
                let n = self.next_handle.fetch_add(1, Ordering::SeqCst);
                RemoteHandle::from(format!("{prefix}-{n}"))
            }
        }
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_action(&self, _chat_id: i64, action: ChatAction) -> FilebotResult<()> {
        self.record(Event::Action(action));
        Ok(())
    }

    async fn reply_text(
        &self,
        _message: &IncomingCommand,
        text: &str,
        format: TextFormat,
    ) -> FilebotResult<()> {
        if self.fail_text {
            return Err(UploadError::new(UploadErrorKind::Transport("offline".into())).into());
        }
        self.record(Event::Text(text.to_string(), format));
        Ok(())
    }

    async fn reply_photo(
        &self,
        _message: &IncomingCommand,
        photo: InputFile,
        caption: &str,
    ) -> FilebotResult<RemoteHandle> {
        if self.reject_photos && matches!(photo, InputFile::Path(_)) {
            return Err(UploadError::new(UploadErrorKind::PayloadTooLarge(0)).into());
        }
        let handle = self.handle_for("photo", &photo);
        self.record(Event::Photo(photo, caption.to_string()));
        Ok(handle)
    }

    async fn reply_document(
        &self,
        _message: &IncomingCommand,
        document: InputFile,
        caption: &str,
    ) -> FilebotResult<RemoteHandle> {
        let handle = self.handle_for("doc", &document);
        self.record(Event::Document(document, caption.to_string()));
        Ok(handle)
    }
}
