//! # CliRunner
//!
//! ABI-stable shim that runs one shell command and copies its captured output
//! into a caller-owned byte buffer. Built as a `cdylib` for native and managed
//! hosts, and as an `rlib` for Rust callers and tests.
//!
//! ## Entry points
//!
//! | Symbol | Purpose |
//! |---|---|
//! | `ExecShell` | run through bash (POSIX) or `cmd` (Windows) |
//! | `ExecPowerShell` | run through bash (POSIX) or PowerShell (Windows) |
//! | `Run` | environment JSON plus every launch flag |
//! | `CliRunnerLastError` / `CliRunnerLastErrorCode` | why the last call on this thread failed |
//!
//! Text crosses the boundary as null-terminated UTF-8 without a BOM in both
//! directions; per-shell stream encodings are handled by [`clirunner_shell`].
//!
//! ## Return values
//!
//! - `n >= 0`: payload bytes written to the buffer, terminator excluded.
//!   Output longer than `capacity - 1` bytes is silently truncated, possibly
//!   mid-character.
//! - `0` also covers a null command, a null buffer and a non-positive capacity.
//! - `n < 0`: a [`FailureCode`]. The command never ran (spawn failure) or its
//!   streams could not be transferred.
//!
//! Set `CLIRUNNER_LOG` (e.g. `clirunner_shell=debug`) to log to stderr.

pub mod buffer;
pub mod ffi;
pub mod last_error;
mod logging;

pub use buffer::DestinationBuffer;
pub use ffi::{CliRunnerLastError, CliRunnerLastErrorCode, ExecPowerShell, ExecShell, Run};
pub use last_error::{FailureCode, LastError};
pub use logging::LOG_ENV;
