//! Domain-specific error types for devstrap.
//!
//! This module defines `DevstrapError`, a `thiserror`-based enum that
//! provides typed error variants for the failure modes of provisioning:
//! validation errors raised before any side effect, execution errors from
//! external commands, and I/O errors from direct filesystem access.
//!
//! `DevstrapError` implements `Into<anyhow::Error>`, so the `?` operator
//! converts it automatically at the orchestration boundary that returns
//! `anyhow::Result`.

use std::io;

/// Exit code reported when a process could not be launched at all.
pub const LAUNCH_FAILURE_CODE: i32 = -1;

/// Formats an IO error kind into a human-readable message.
///
/// Provides consistent messages for common IO error kinds
/// (e.g., "I/O error: not found") instead of the OS-level messages
/// (e.g., "No such file or directory (os error 2)"). For unrecognized
/// error kinds, falls back to including the OS-level error message.
pub(crate) fn io_error_kind_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "I/O error: not found".to_string(),
        io::ErrorKind::PermissionDenied => "I/O error: permission denied".to_string(),
        io::ErrorKind::IsADirectory => "I/O error: is a directory".to_string(),
        _ => format!("I/O error: {}", err),
    }
}

/// Domain-specific error type for devstrap.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DevstrapError {
    /// A validation constraint was violated.
    #[error("validation error: {0}")]
    Validation(String),

    /// An external command exited non-zero or could not be launched.
    #[error("command execution failed: {command}: {status}")]
    Execution {
        /// The command line that was executed.
        command: String,
        /// Exit code of the process, or [`LAUNCH_FAILURE_CODE`].
        code: i32,
        /// Human-readable reason for the failure.
        status: String,
    },

    /// The command binary could not be located in `PATH`.
    #[error("command not found in PATH: {command}")]
    CommandNotFound {
        /// The command that was looked up.
        command: String,
    },

    /// The profile could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading the operator's answer failed.
    #[error("prompt error: {0}")]
    Prompt(String),

    /// An I/O operation failed with contextual information.
    #[error("{context}: {message}")]
    Io {
        /// What was being done when the error occurred, usually including a path.
        context: String,
        /// Message derived from [`io_error_kind_message`].
        message: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A task failed; the message is prefixed with the task's display name.
    #[error("{name}: {error}")]
    Task {
        /// Display name of the failing task.
        name: String,
        /// The underlying failure.
        error: Box<DevstrapError>,
    },
}

impl DevstrapError {
    /// Creates an `Io` variant with the `message` field derived from `source`.
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: io_error_kind_message(&source),
            source,
        }
    }

    /// Wraps an error with the display name of the task that produced it.
    pub fn task(name: impl Into<String>, error: DevstrapError) -> Self {
        Self::Task {
            name: name.into(),
            error: Box::new(error),
        }
    }

    /// Returns the process exit code carried by this error, if any.
    ///
    /// Looks through `Task` wrappers. A command that could not be found or
    /// launched reports [`LAUNCH_FAILURE_CODE`].
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Execution { code, .. } => Some(*code),
            Self::CommandNotFound { .. } => Some(LAUNCH_FAILURE_CODE),
            Self::Task { error, .. } => error.exit_code(),
            _ => None,
        }
    }
}
