//! Child process spawning with per-stream redirection.
//!
//! Redirected streams become pipes; the rest are inherited from the host.
//! The spawned [`LaunchedProcess`] is handed to [`crate::capture`], which
//! drives exit and stream reads together.

use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::encoding::EncodingAssignment;
use crate::error::{Result, RunnerError};
use crate::invocation::InvocationSpec;
use crate::request::CommandRequest;

/// A running child plus what capture needs to finish the call.
#[derive(Debug)]
pub struct LaunchedProcess {
    pub(crate) child: Child,
    pub(crate) encodings: EncodingAssignment,
    pub(crate) wait_for_exit: bool,
    pub(crate) stdin_payload: Option<Vec<u8>>,
}

impl LaunchedProcess {
    /// OS process id, while the child has not been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

fn stdio_for(redirect: bool) -> Stdio {
    if redirect {
        Stdio::piped()
    } else {
        Stdio::inherit()
    }
}

/// Spawn `invocation` as configured by `request`.
///
/// Must be called from within a Tokio runtime. A spawn failure is returned
/// as [`RunnerError::Spawn`] and is never folded into captured output.
pub fn launch(
    invocation: &InvocationSpec,
    encodings: EncodingAssignment,
    request: &CommandRequest,
) -> Result<LaunchedProcess> {
    let options = request.options;
    let mut command = Command::new(invocation.program());

    #[cfg(windows)]
    {
        // Windows children parse their own command line, so hand over the
        // quoted argument string untouched.
        command.raw_arg(invocation.argument_string());
        if options.create_no_window {
            command.creation_flags(windows_sys::Win32::System::Threading::CREATE_NO_WINDOW);
        }
    }

    #[cfg(not(windows))]
    command.args(invocation.args());

    if let Some(environment) = &request.environment {
        command.envs(environment.iter());
    }

    command
        .stdin(stdio_for(options.redirection.stdin))
        .stdout(stdio_for(options.redirection.stdout))
        .stderr(stdio_for(options.redirection.stderr));

    let child = command.spawn().map_err(|source| RunnerError::Spawn {
        program: invocation.program().to_string(),
        source,
    })?;

    tracing::debug!(
        pid = child.id(),
        shell = ?invocation.shell(),
        env_overrides = request.environment.as_ref().map_or(0, |env| env.len()),
        "spawned child process"
    );

    let stdin_payload = match (&request.stdin, options.redirection.stdin) {
        (Some(text), true) => Some(encodings.stdin.encode(text)),
        _ => None,
    };

    Ok(LaunchedProcess {
        child,
        encodings,
        wait_for_exit: options.wait_for_exit,
        stdin_payload,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::platform::ShellKind;
    use crate::request::Redirection;
    use std::io::ErrorKind;

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let invocation = InvocationSpec {
            shell: ShellKind::Posix,
            program: "/nonexistent/clirunner-shell".to_string(),
            args: vec!["-c".to_string(), "true".to_string()],
        };
        let request = CommandRequest::new("true", ShellKind::Posix);

        let err = launch(&invocation, EncodingAssignment::UTF8, &request)
            .expect_err("spawn should fail");
        match err {
            RunnerError::Spawn { program, source } => {
                assert_eq!(program, "/nonexistent/clirunner-shell");
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stdin_payload_only_kept_when_redirected() -> anyhow::Result<()> {
        let invocation = InvocationSpec::build("true", ShellKind::Posix);
        let request = CommandRequest::new("true", ShellKind::Posix)
            .with_stdin("ignored")
            .with_redirection(Redirection::NONE);

        let mut process = launch(&invocation, EncodingAssignment::UTF8, &request)?;
        assert!(process.stdin_payload.is_none());
        assert!(process.child.stdout.is_none());
        process.child.wait().await?;
        Ok(())
    }
}
