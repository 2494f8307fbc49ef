//! Unified error types for the control-mode client.

use std::fmt;

use crate::router::CommandResult;

/// Errors surfaced by the transport, the router, and the command layer.
///
/// The enum is `Clone` because a single transport failure fans out to every
/// caller that still has a command outstanding.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// `run_command` was called with an empty or whitespace-only command.
    EmptyCommand,
    /// The router was closed by the caller.
    RouterClosed,
    /// The control transport terminated without a more specific failure.
    TransportClosed,
    /// The control transport terminated abnormally (stderr output, nonzero
    /// exit, or a read error).
    Transport(String),
    /// Writing a command line to the child failed.
    SendFailure(String),
    /// The tmux child process could not be started.
    Spawn(String),
    /// A tmux socket path failed validation.
    Socket(String),
    /// A caller-provided argument failed validation.
    InvalidArgument(String),
    /// tmux answered a command with an `%error` frame.
    CommandFailed {
        /// The command that was sent.
        command: String,
        /// Message text from the error frame tail.
        message: String,
        /// Output accumulated before the error frame arrived.
        result: CommandResult,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCommand => write!(f, "empty command"),
            Self::RouterClosed => write!(f, "router closed"),
            Self::TransportClosed => write!(f, "control transport closed"),
            Self::Transport(msg) => write!(f, "control transport failed: {msg}"),
            Self::SendFailure(msg) => write!(f, "send failed: {msg}"),
            Self::Spawn(msg) => write!(f, "failed to start tmux: {msg}"),
            Self::Socket(msg) => write!(f, "{msg}"),
            Self::InvalidArgument(msg) => write!(f, "{msg}"),
            Self::CommandFailed {
                command, message, ..
            } => {
                write!(f, "tmux error for {command:?}: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Message text for a command failure, or the display form otherwise.
    pub fn message(&self) -> String {
        match self {
            Self::CommandFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Partial output captured before an `%error` frame, if any.
    pub fn partial_result(&self) -> Option<&CommandResult> {
        match self {
            Self::CommandFailed { result, .. } => Some(result),
            _ => None,
        }
    }
}
