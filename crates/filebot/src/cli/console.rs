//! Transport that prints replies to stdout.

use async_trait::async_trait;
use filebot::{
    ChatAction, ChatTransport, FilebotResult, IncomingCommand, InputFile, RemoteHandle, TextFormat,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Prints every reply and answers uploads with synthetic `console-N` handles.
///
/// Used by `filebot exec` to run commands without a chat platform.
#[derive(Debug, Default)]
pub struct ConsoleTransport {
    uploads: AtomicUsize,
}

impl ConsoleTransport {
    /// Create a console transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files "uploaded" so far.
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    fn send(&self, kind: &str, file: InputFile, caption: &str) -> RemoteHandle {
        let handle = match file {
            InputFile::Path(path) => {
                let n = self.uploads.fetch_add(1, Ordering::SeqCst);
                println!("[{kind} upload] {}", path.display());
                RemoteHandle::from(format!("console-{n}"))
            }
            InputFile::Handle(handle) => {
                println!("[{kind} cached] {handle}");
                handle
            }
        };
        if !caption.is_empty() {
            println!("  caption: {caption}");
        }
        handle
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send_action(&self, _chat_id: i64, action: ChatAction) -> FilebotResult<()> {
        println!("[{action}]");
        Ok(())
    }

    async fn reply_text(
        &self,
        _message: &IncomingCommand,
        text: &str,
        format: TextFormat,
    ) -> FilebotResult<()> {
        match format {
            TextFormat::Plain => println!("{text}"),
            TextFormat::Markdown => println!("(markdown)\n{text}"),
        }
        Ok(())
    }

    async fn reply_photo(
        &self,
        _message: &IncomingCommand,
        photo: InputFile,
        caption: &str,
    ) -> FilebotResult<RemoteHandle> {
        Ok(self.send("photo", photo, caption))
    }

    async fn reply_document(
        &self,
        _message: &IncomingCommand,
        document: InputFile,
        caption: &str,
    ) -> FilebotResult<RemoteHandle> {
        Ok(self.send("document", document, caption))
    }
}
