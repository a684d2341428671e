use std::fmt;
use std::io;

use thiserror::Error;

/// Standard stream of the child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamName {
    Stdin,
    Stdout,
    Stderr,
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdin => "stdin",
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        })
    }
}

/// Failures that stop a command from producing captured output.
///
/// Absent output, truncation and malformed environment JSON are not errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to transfer child {stream}: {source}")]
    Stream {
        stream: StreamName,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for child exit: {0}")]
    Wait(#[source] io::Error),

    #[error("shell-execute launches cannot redirect standard streams")]
    ShellExecuteRedirect,

    #[error("failed to start process runtime: {0}")]
    Runtime(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
