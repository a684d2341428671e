//! Per-thread record of the most recent failed call.
//!
//! Exceptions cannot cross the ABI, so a failed call returns a negative
//! [`FailureCode`] and leaves its message here for `CliRunnerLastError`.

use std::cell::RefCell;
use std::ffi::c_int;

use clirunner_shell::RunnerError;

/// Negative return values of the exported entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum FailureCode {
    /// The shell executable could not be started.
    SpawnFailed = -1,
    /// Reading, writing or waiting on the child failed after spawn.
    StreamFailed = -2,
    /// The launch flags contradict each other.
    InvalidLaunch = -3,
    /// Runtime construction failed or the call panicked.
    Internal = -4,
}

impl FailureCode {
    pub const fn as_raw(self) -> c_int {
        self as c_int
    }
}

impl From<&RunnerError> for FailureCode {
    fn from(error: &RunnerError) -> Self {
        match error {
            RunnerError::Spawn { .. } => Self::SpawnFailed,
            RunnerError::Stream { .. } | RunnerError::Wait(_) => Self::StreamFailed,
            RunnerError::ShellExecuteRedirect => Self::InvalidLaunch,
            RunnerError::Runtime(_) => Self::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub code: FailureCode,
    pub message: String,
}

thread_local! {
    static LAST_ERROR: RefCell<Option<LastError>> = const { RefCell::new(None) };
}

pub fn record(code: FailureCode, message: impl Into<String>) {
    let error = LastError {
        code,
        message: message.into(),
    };
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(error));
}

pub fn clear() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

/// Snapshot of this thread's last failure, if the most recent call failed.
pub fn get() -> Option<LastError> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}
