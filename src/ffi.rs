//! Exported `extern "C"` entry points.
//!
//! All text crossing the boundary is null-terminated UTF-8 without a BOM.
//! Successful calls return the payload byte count written to the destination
//! buffer (terminator excluded). Input-contract violations return 0. Failures
//! return a negative [`FailureCode`] and record a message readable through
//! [`CliRunnerLastError`].
#![allow(non_snake_case, unsafe_code)]

use std::any::Any;
use std::ffi::{CStr, c_char, c_int};
use std::panic::{self, AssertUnwindSafe};

use clirunner_shell::{
    CommandExecutor, CommandRequest, EnvironmentOverrides, ProcessCommandExecutor, Redirection,
    RunOptions, ShellKind,
};

use crate::buffer::DestinationBuffer;
use crate::last_error::{self, FailureCode};
use crate::logging;

/// Copy a null-terminated UTF-8 string out of foreign memory. Invalid UTF-8
/// is replaced with U+FFFD.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated byte string.
unsafe fn read_utf8(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and null-terminated per the caller contract.
    let raw = unsafe { CStr::from_ptr(ptr) };
    Some(raw.to_string_lossy().into_owned())
}

/// # Safety
/// `ptr` must be null or point to a null-terminated byte string.
unsafe fn read_environment(ptr: *const c_char) -> Option<EnvironmentOverrides> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and null-terminated per the caller contract.
    let raw = unsafe { CStr::from_ptr(ptr) };
    match raw.to_str() {
        Ok(json) => EnvironmentOverrides::parse_lenient(json),
        Err(error) => {
            tracing::warn!(%error, "ignoring environment overrides that are not UTF-8");
            None
        }
    }
}

fn byte_count(written: usize) -> c_int {
    // `written` is below the caller's `c_int` capacity
    c_int::try_from(written).unwrap_or(c_int::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn fail(code: FailureCode, message: String, buffer: Option<DestinationBuffer<'_>>) -> c_int {
    tracing::error!(code = code.as_raw(), %message, "command did not run to completion");
    last_error::record(code, message);
    match buffer {
        Some(mut buffer) => {
            buffer.write(None);
            code.as_raw()
        }
        // An unusable buffer keeps the byte-count contract; the code stays
        // readable through `CliRunnerLastErrorCode`.
        None => 0,
    }
}

/// Shared body of every command entry point.
///
/// `prepare` copies the foreign inputs and returns `None` for a null command.
/// The command still runs when the buffer is invalid; only the copy-out is
/// skipped and 0 is returned.
pub(crate) fn run_entry<E, F>(
    executor: &E,
    mut buffer: Option<DestinationBuffer<'_>>,
    prepare: F,
) -> c_int
where
    E: CommandExecutor,
    F: FnOnce() -> Option<CommandRequest>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> clirunner_shell::Result<c_int> {
        logging::init();
        last_error::clear();

        let Some(request) = prepare() else {
            if let Some(buffer) = buffer.as_mut() {
                buffer.write(None);
            }
            return Ok(0);
        };
        let output = executor.execute(&request)?;
        Ok(buffer
            .as_mut()
            .map_or(0, |buffer| byte_count(buffer.write(Some(&output.text)))))
    }));

    match outcome {
        Ok(Ok(written)) => written,
        Ok(Err(error)) => fail(FailureCode::from(&error), error.to_string(), buffer),
        Err(payload) => fail(
            FailureCode::Internal,
            format!("panic while running command: {}", panic_message(payload.as_ref())),
            buffer,
        ),
    }
}

/// Runs a body that never touches a command, mapping a panic to `fallback`.
fn contain(fallback: c_int, body: impl FnOnce() -> c_int) -> c_int {
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or(fallback)
}

/// # Safety
/// `command` must be null or a null-terminated string; `dest` must be null or
/// valid for writes of `dest_len` bytes for the duration of the call.
unsafe fn exec_with_shell(
    command: *const c_char,
    dest: *mut u8,
    dest_len: c_int,
    prefer_powershell: bool,
) -> c_int {
    // SAFETY: forwarded caller contract.
    let buffer = unsafe { DestinationBuffer::from_raw(dest, dest_len) };
    run_entry(&ProcessCommandExecutor, buffer, || {
        // SAFETY: forwarded caller contract.
        let command = unsafe { read_utf8(command) }?;
        Some(CommandRequest::new(command, ShellKind::detect(prefer_powershell)))
    })
}

/// Run `command` through bash on POSIX hosts or `cmd` on Windows, capturing
/// stdout (stderr when stdout is empty) into `dest`.
///
/// # Safety
/// `command` must be null or a null-terminated string. `dest` must be null
/// or valid for writes of `dest_len` bytes for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ExecShell(command: *const c_char, dest: *mut u8, dest_len: c_int) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { exec_with_shell(command, dest, dest_len, false) }
}

/// Like [`ExecShell`], but through PowerShell on Windows hosts.
///
/// # Safety
/// Same contract as [`ExecShell`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ExecPowerShell(
    command: *const c_char,
    dest: *mut u8,
    dest_len: c_int,
) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { exec_with_shell(command, dest, dest_len, true) }
}

/// Fully configurable variant. `environment_json` is an optional JSON object
/// of string pairs added to the child environment; malformed JSON is ignored.
///
/// # Safety
/// `command` and `environment_json` must each be null or a null-terminated
/// string. `dest` must be null or valid for writes of `dest_len` bytes for the
/// duration of the call.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
pub unsafe extern "C" fn Run(
    command: *const c_char,
    dest: *mut u8,
    environment_json: *const c_char,
    dest_len: c_int,
    wait_for_exit: bool,
    redirect_stdin: bool,
    redirect_stdout: bool,
    redirect_stderr: bool,
    use_shell_execute: bool,
    create_no_window: bool,
    use_powershell: bool,
    force_utf8: bool,
) -> c_int {
    // SAFETY: forwarded caller contract.
    let buffer = unsafe { DestinationBuffer::from_raw(dest, dest_len) };
    let options = RunOptions {
        wait_for_exit,
        redirection: Redirection {
            stdin: redirect_stdin,
            stdout: redirect_stdout,
            stderr: redirect_stderr,
        },
        use_shell_execute,
        create_no_window,
        force_utf8,
    };

    run_entry(&ProcessCommandExecutor, buffer, || {
        // SAFETY: forwarded caller contract.
        let command = unsafe { read_utf8(command) }?;
        // SAFETY: forwarded caller contract.
        let environment = unsafe { read_environment(environment_json) };
        let request =
            CommandRequest::new(command, ShellKind::detect(use_powershell)).with_options(options);
        Some(match environment {
            Some(environment) => request.with_environment(environment),
            None => request,
        })
    })
}

/// Copy the calling thread's last failure message into `dest`. Returns the
/// payload byte count, or 0 when the last call on this thread succeeded.
///
/// # Safety
/// `dest` must be null or valid for writes of `dest_len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn CliRunnerLastError(dest: *mut u8, dest_len: c_int) -> c_int {
    // SAFETY: forwarded caller contract.
    let Some(mut buffer) = (unsafe { DestinationBuffer::from_raw(dest, dest_len) }) else {
        return 0;
    };
    contain(0, || {
        let message = last_error::get().map(|error| error.message);
        byte_count(buffer.write(message.as_deref()))
    })
}

/// Failure code of the calling thread's last call, or 0 if it succeeded.
#[unsafe(no_mangle)]
pub extern "C" fn CliRunnerLastErrorCode() -> c_int {
    contain(FailureCode::Internal.as_raw(), || {
        last_error::get().map_or(0, |error| error.code.as_raw())
    })
}
