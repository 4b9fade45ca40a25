//! Error types for the interpreter.
//!
//! Every error is handled at the segment boundary: reported on stderr with
//! line context, converted to an exit status, and the session moves on to the
//! next input line.

use std::io;

/// Errors produced by the command interpretation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Malformed chain: operator at start/end of line or two adjacent
    /// operators with no command between.
    #[error("syntax error near unexpected token `{0}'")]
    Parse(String),

    #[error("{0}: not found")]
    CommandNotFound(String),

    /// Builtin argument validation failure (`exit 12abc`, `setenv` arity, ...).
    #[error("{0}")]
    InvalidArgument(String),

    #[error("cd: can't cd to {0}")]
    DirectoryNotFound(String),

    #[error("{0}: Permission denied")]
    PermissionDenied(String),

    #[error("{name}: {source}")]
    SpawnFailure { name: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Exit status the error maps to, following the usual shell conventions:
    /// 2 for syntax/usage errors, 126 for permission, 127 for lookup failure.
    pub fn status(&self) -> i32 {
        match self {
            ShellError::Parse(_) => 2,
            ShellError::CommandNotFound(_) => 127,
            ShellError::InvalidArgument(_) => 2,
            ShellError::DirectoryNotFound(_) => 2,
            ShellError::PermissionDenied(_) => 126,
            ShellError::SpawnFailure { .. } => 1,
            ShellError::Io(_) => 1,
        }
    }
}

/// Convenience alias for pipeline-internal results.
pub type Result<T> = std::result::Result<T, ShellError>;
