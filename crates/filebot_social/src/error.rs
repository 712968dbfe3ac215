//! Command execution errors.

use derive_more::{Display, Error};
use filebot_error::FilebotError;

/// Result type for command handlers.
pub type CommandResult<T> = Result<T, CommandError>;

/// Specific command failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum CommandErrorKind {
    /// Text did not start with a `/command`.
    #[display("Not a command: {}", _0)]
    NotACommand(String),

    /// Upload, storage or library failure below the command layer.
    #[display("Command '{}' failed: {}", command, reason)]
    Failed {
        /// Command that failed
        command: String,
        /// Underlying error message
        reason: String,
    },

    /// Blocking library task panicked or was cancelled.
    #[display("Background task failed: {}", _0)]
    TaskFailed(String),
}

/// Command error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The kind of error that occurred
    pub kind: CommandErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new command error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Wrap a lower-level failure of `command`.
    #[track_caller]
    pub fn failed(command: &str, err: &FilebotError) -> Self {
        Self::new(CommandErrorKind::Failed {
            command: command.to_string(),
            reason: err.to_string(),
        })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CommandErrorKind {
        &self.kind
    }
}
