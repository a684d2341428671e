//! Single-command shell execution core behind the CliRunner ABI.
//!
//! A [`CommandRequest`] flows left to right: the platform picks a
//! [`ShellKind`], [`InvocationSpec`] turns the command into a shell
//! invocation, [`EncodingAssignment`] binds a text encoding to each
//! redirected stream, the launcher spawns the child and capture reads its
//! output with the stdout-then-stderr fallback. [`ProcessCommandExecutor`]
//! wires the steps together behind the [`CommandExecutor`] trait so callers
//! can substitute their own strategy.

pub mod capture;
pub mod encoding;
pub mod environment;
pub mod error;
pub mod executor;
pub mod invocation;
pub mod launcher;
pub mod platform;
pub mod request;

pub use capture::{CapturedOutput, NO_OUTPUT_SENTINEL, OutputSource};
pub use encoding::{EncodingAssignment, TextEncoding};
pub use environment::EnvironmentOverrides;
pub use error::{Result, RunnerError, StreamName};
pub use executor::{CommandExecutor, ProcessCommandExecutor};
pub use invocation::{InvocationSpec, POWERSHELL_UTF8_PREAMBLE};
pub use launcher::LaunchedProcess;
pub use platform::{HostFamily, ShellKind};
pub use request::{CommandRequest, Redirection, RunOptions};
