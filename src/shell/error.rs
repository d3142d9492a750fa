//! Shell-level errors
//!
//! Every recoverable command failure becomes one of these kinds; the
//! dispatcher prints the rendered message to the error stream and the
//! session continues unchanged.

use thiserror::Error;

use crate::fs::FsError;

#[derive(Error, Debug)]
pub enum ShellError {
    /// A filesystem error surfaced by a command, prefixed with the command
    /// name the way coreutils do.
    #[error("{command}: {source}")]
    Command {
        command: &'static str,
        source: FsError,
    },

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown command: '{0}'")]
    UnknownCommand(String),
}

impl ShellError {
    pub fn command(command: &'static str, source: FsError) -> Self {
        ShellError::Command { command, source }
    }
}
