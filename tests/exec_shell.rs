#![cfg(unix)]
#![allow(unsafe_code)]

use std::ffi::{CString, c_int};
use std::fs;
use std::ptr;

use clirunner::{CliRunnerLastErrorCode, ExecPowerShell, ExecShell, FailureCode, Run};
use pretty_assertions::assert_eq;

const SENTINEL: &str = "No stdout or stderr";

fn exec_shell(command: &str, capacity: usize) -> (c_int, Vec<u8>) {
    let command = CString::new(command).expect("no interior nul");
    let mut buffer = vec![0xAAu8; capacity];
    let len = c_int::try_from(capacity).expect("capacity fits c_int");
    let written = unsafe { ExecShell(command.as_ptr(), buffer.as_mut_ptr(), len) };
    (written, buffer)
}

fn payload(written: c_int, buffer: &[u8]) -> &[u8] {
    let written = usize::try_from(written).expect("non-negative result");
    let (payload, rest) = buffer.split_at_checked(written).expect("payload within buffer");
    assert_eq!(rest.first(), Some(&0), "payload must be null-terminated");
    payload
}

struct RunFlags {
    env: Option<&'static str>,
    wait_for_exit: bool,
    redirect_stdin: bool,
    redirect_stdout: bool,
    redirect_stderr: bool,
    use_shell_execute: bool,
    force_utf8: bool,
}

impl Default for RunFlags {
    fn default() -> Self {
        Self {
            env: None,
            wait_for_exit: true,
            redirect_stdin: false,
            redirect_stdout: true,
            redirect_stderr: true,
            use_shell_execute: false,
            force_utf8: false,
        }
    }
}

fn run(command: &str, capacity: usize, flags: RunFlags) -> (c_int, Vec<u8>) {
    let command = CString::new(command).expect("no interior nul");
    let env = flags.env.map(|json| CString::new(json).expect("no interior nul"));
    let env_ptr = env.as_ref().map_or(ptr::null(), |json| json.as_ptr());
    let mut buffer = vec![0xAAu8; capacity];
    let len = c_int::try_from(capacity).expect("capacity fits c_int");
    let written = unsafe {
        Run(
            command.as_ptr(),
            buffer.as_mut_ptr(),
            env_ptr,
            len,
            flags.wait_for_exit,
            flags.redirect_stdin,
            flags.redirect_stdout,
            flags.redirect_stderr,
            flags.use_shell_execute,
            true,
            false,
            flags.force_utf8,
        )
    };
    (written, buffer)
}

#[test]
fn echo_fits_in_buffer() {
    let (written, buffer) = exec_shell("echo hello", 64);
    assert_eq!(written, 6);
    assert_eq!(payload(written, &buffer), b"hello\n");
}

#[test]
fn echo_truncates_to_capacity_minus_one() {
    let (written, buffer) = exec_shell("echo hello", 3);
    assert_eq!(written, 2);
    assert_eq!(buffer, b"he\0");
}

#[test]
fn multibyte_output_round_trips() {
    let (written, buffer) = exec_shell("printf 'Configuração ✓'", 64);
    assert_eq!(payload(written, &buffer), "Configuração ✓".as_bytes());
    assert_eq!(written, 18);
}

#[test]
fn command_text_arrives_as_utf8() {
    let (written, buffer) = exec_shell("echo Configuração", 64);
    assert_eq!(payload(written, &buffer), "Configuração\n".as_bytes());
}

#[test]
fn empty_stdout_falls_back_to_stderr() {
    let (written, buffer) = exec_shell("echo warning >&2", 64);
    assert_eq!(payload(written, &buffer), b"warning\n");
}

#[test]
fn silent_command_yields_empty_result() {
    let (written, buffer) = exec_shell("true", 16);
    assert_eq!(written, 0);
    assert_eq!(buffer.first(), Some(&0));
    assert_eq!(CliRunnerLastErrorCode(), 0);
}

#[test]
fn powershell_entry_uses_bash_on_posix() {
    let command = CString::new("echo $0").expect("no interior nul");
    let mut buffer = vec![0u8; 64];
    let written = unsafe { ExecPowerShell(command.as_ptr(), buffer.as_mut_ptr(), 64) };
    assert_eq!(payload(written, &buffer), b"/bin/bash\n");
}

#[test]
fn null_buffer_and_bad_capacity_return_zero() {
    let command = CString::new("echo hello").expect("no interior nul");
    let written = unsafe { ExecShell(command.as_ptr(), ptr::null_mut(), 64) };
    assert_eq!(written, 0);

    let mut buffer = vec![0xAAu8; 8];
    for capacity in [0, -1] {
        let written = unsafe { ExecShell(command.as_ptr(), buffer.as_mut_ptr(), capacity) };
        assert_eq!(written, 0);
    }
    assert_eq!(buffer, vec![0xAA; 8], "nothing may be written");
}

#[test]
fn null_command_writes_empty_string() {
    let mut buffer = vec![0xAAu8; 4];
    let written = unsafe { ExecShell(ptr::null(), buffer.as_mut_ptr(), 4) };
    assert_eq!(written, 0);
    assert_eq!(buffer, [0, 0xAA, 0xAA, 0xAA]);
}

#[test]
fn run_injects_environment_json() {
    let flags = RunFlags {
        env: Some(r#"{"FOO":"bar"}"#),
        ..RunFlags::default()
    };
    let (written, buffer) = run("echo $FOO", 64, flags);
    assert_eq!(payload(written, &buffer), b"bar\n");
}

#[test]
fn run_ignores_malformed_environment_json() {
    let flags = RunFlags {
        env: Some(r#"{"FOO": 1"#),
        ..RunFlags::default()
    };
    let (written, buffer) = run("echo \"[${CLIRUNNER_UNSET_VAR}]\"", 64, flags);
    assert_eq!(payload(written, &buffer), b"[]\n");
}

#[test]
fn run_without_redirection_returns_sentinel() {
    let flags = RunFlags {
        redirect_stdout: false,
        redirect_stderr: false,
        ..RunFlags::default()
    };
    let (written, buffer) = run("true", 64, flags);
    assert_eq!(payload(written, &buffer), SENTINEL.as_bytes());
}

#[test]
fn sentinel_obeys_truncation() {
    let flags = RunFlags {
        redirect_stdout: false,
        redirect_stderr: false,
        ..RunFlags::default()
    };
    let (written, buffer) = run("true", 4, flags);
    assert_eq!(written, 3);
    assert_eq!(buffer, b"No \0");
}

#[test]
fn run_stdout_only_uses_sentinel_when_empty() {
    let flags = RunFlags {
        redirect_stderr: false,
        ..RunFlags::default()
    };
    let (written, buffer) = run("true", 64, flags);
    assert_eq!(payload(written, &buffer), SENTINEL.as_bytes());
}

#[test]
fn run_stderr_only_still_falls_through() {
    let flags = RunFlags {
        redirect_stdout: false,
        ..RunFlags::default()
    };
    let (written, buffer) = run("echo oops >&2", 64, flags);
    assert_eq!(payload(written, &buffer), b"oops\n");
}

#[test]
fn run_without_wait_still_reads_to_end_of_stream() {
    let flags = RunFlags {
        wait_for_exit: false,
        ..RunFlags::default()
    };
    let (written, buffer) = run("echo done", 64, flags);
    assert_eq!(payload(written, &buffer), b"done\n");
}

#[test]
fn shell_execute_with_redirection_is_rejected() {
    let flags = RunFlags {
        use_shell_execute: true,
        ..RunFlags::default()
    };
    let (written, buffer) = run("echo never", 64, flags);
    assert_eq!(written, FailureCode::InvalidLaunch.as_raw());
    assert_eq!(buffer.first(), Some(&0));
    assert_eq!(CliRunnerLastErrorCode(), FailureCode::InvalidLaunch.as_raw());
}

#[test]
fn failure_with_null_buffer_returns_zero_but_records_code() {
    let command = CString::new("echo never").expect("no interior nul");
    let written = unsafe {
        Run(
            command.as_ptr(),
            ptr::null_mut(),
            ptr::null(),
            64,
            true,
            false,
            true,
            true,
            true,
            true,
            false,
            false,
        )
    };
    assert_eq!(written, 0);
    assert_eq!(CliRunnerLastErrorCode(), FailureCode::InvalidLaunch.as_raw());
}

#[test]
fn redirected_stdin_without_payload_reaches_end_of_input() {
    let (written, buffer) = exec_shell("cat", 16);
    assert_eq!(written, 0);
    assert_eq!(buffer.first(), Some(&0));
    assert_eq!(CliRunnerLastErrorCode(), 0);

    let flags = RunFlags {
        redirect_stdin: true,
        ..RunFlags::default()
    };
    let (written, buffer) = run("cat; echo after", 32, flags);
    assert_eq!(payload(written, &buffer), b"after\n");
}

#[test]
fn force_utf8_keeps_multibyte_output_intact() {
    let flags = RunFlags {
        force_utf8: true,
        ..RunFlags::default()
    };
    let (written, buffer) = run("printf 'Configuração ✓'", 64, flags);
    assert_eq!(written, 18);
    assert_eq!(payload(written, &buffer), "Configuração ✓".as_bytes());
}

#[test]
fn scripts_with_quotes_run_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("greet.sh");
    fs::write(&script, "printf '%s|%s' \"$1\" \"$2\"\n").expect("write script");

    let command = format!("bash '{}' 'a b' \"c'd\"", script.display());
    let (written, buffer) = exec_shell(&command, 64);
    assert_eq!(payload(written, &buffer), b"a b|c'd");
}

#[test]
fn concurrent_calls_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|n| std::thread::spawn(move || exec_shell(&format!("echo worker-{n}"), 32)))
        .collect();

    for (n, handle) in handles.into_iter().enumerate() {
        let (written, buffer) = handle.join().expect("worker thread");
        assert_eq!(payload(written, &buffer), format!("worker-{n}\n").as_bytes());
    }
}
