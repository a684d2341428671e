//! Output capture with stdout-to-stderr fallback.

use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::ChildStdin;

use crate::error::{Result, RunnerError, StreamName};
use crate::launcher::LaunchedProcess;

/// Substituted when stdout is empty and stderr was not redirected.
pub const NO_OUTPUT_SENTINEL: &str = "No stdout or stderr";

/// Stream the captured text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSource {
    Stdout,
    Stderr,
    Sentinel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub text: String,
    pub source: OutputSource,
    /// Exit code when the child was waited on (or had already exited) and
    /// ended normally.
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    /// Apply the fallback policy. `None` means the stream was not redirected.
    ///
    /// Empty stdout (including unredirected stdout) falls through to stderr
    /// when stderr was redirected, even if stderr is empty too. The sentinel
    /// is used only when stderr was not redirected.
    pub fn select(stdout: Option<String>, stderr: Option<String>, exit_code: Option<i32>) -> Self {
        let (text, source) = match (stdout, stderr) {
            (Some(text), _) if !text.is_empty() => (text, OutputSource::Stdout),
            (_, Some(text)) => (text, OutputSource::Stderr),
            (_, None) => (NO_OUTPUT_SENTINEL.to_string(), OutputSource::Sentinel),
        };
        Self {
            text,
            source,
            exit_code,
        }
    }
}

async fn feed_stdin(stdin: Option<ChildStdin>, payload: Option<Vec<u8>>) -> Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    if let Some(bytes) = payload {
        let written = match stdin.write_all(&bytes).await {
            Ok(()) => stdin.flush().await,
            Err(err) => Err(err),
        };
        match written {
            // the child may exit without reading its input
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
            Err(source) => {
                return Err(RunnerError::Stream {
                    stream: StreamName::Stdin,
                    source,
                });
            }
            Ok(()) => {}
        }
    }
    drop(stdin);
    Ok(())
}

async fn read_stream<R>(stream: Option<R>, name: StreamName) -> Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = stream else {
        return Ok(None);
    };
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .await
        .map_err(|source| RunnerError::Stream {
            stream: name,
            source,
        })?;
    Ok(Some(buf))
}

/// Drain the child's redirected streams and, if requested, wait for exit.
///
/// Exit, stdin feed and both reads progress together on the current task so
/// a chatty child never stalls on a full pipe. Reads run to end-of-stream;
/// without `wait_for_exit` they still block until the child closes them.
pub async fn capture(process: LaunchedProcess) -> Result<CapturedOutput> {
    let LaunchedProcess {
        mut child,
        encodings,
        wait_for_exit,
        stdin_payload,
    } = process;

    let feed = feed_stdin(child.stdin.take(), stdin_payload);
    let stdout_read = read_stream(child.stdout.take(), StreamName::Stdout);
    let stderr_read = read_stream(child.stderr.take(), StreamName::Stderr);

    let (fed, stdout, stderr, exit_code) = if wait_for_exit {
        let (fed, stdout, stderr, status) =
            tokio::join!(feed, stdout_read, stderr_read, child.wait());
        let status = status.map_err(RunnerError::Wait)?;
        (fed, stdout, stderr, status.code())
    } else {
        let (fed, stdout, stderr) = tokio::join!(feed, stdout_read, stderr_read);
        let code = child.try_wait().ok().flatten().and_then(|status| status.code());
        (fed, stdout, stderr, code)
    };
    fed?;

    let stdout = stdout?.map(|bytes| encodings.stdout.decode(&bytes));
    let stderr = match stdout.as_deref() {
        Some(text) if !text.is_empty() => None,
        _ => stderr?.map(|bytes| encodings.stderr.decode(&bytes)),
    };

    let captured = CapturedOutput::select(stdout, stderr, exit_code);
    tracing::debug!(
        source = ?captured.source,
        bytes = captured.text.len(),
        exit_code = captured.exit_code,
        "captured command output"
    );
    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stdout_wins_when_non_empty() {
        let out = CapturedOutput::select(Some("out\n".into()), Some("err\n".into()), Some(0));
        assert_eq!(out.text, "out\n");
        assert_eq!(out.source, OutputSource::Stdout);
    }

    #[test]
    fn empty_stdout_falls_back_to_stderr() {
        let out = CapturedOutput::select(Some(String::new()), Some("boom\n".into()), Some(1));
        assert_eq!(out.text, "boom\n");
        assert_eq!(out.source, OutputSource::Stderr);
    }

    #[test]
    fn unredirected_stdout_falls_through_too() {
        let out = CapturedOutput::select(None, Some("only err".into()), None);
        assert_eq!(out.source, OutputSource::Stderr);
    }

    #[test]
    fn redirected_but_silent_stderr_is_empty_not_sentinel() {
        let out = CapturedOutput::select(Some(String::new()), Some(String::new()), Some(0));
        assert_eq!(out.text, "");
        assert_eq!(out.source, OutputSource::Stderr);
    }

    #[test]
    fn sentinel_when_stderr_not_redirected() {
        let out = CapturedOutput::select(Some(String::new()), None, Some(0));
        assert_eq!(out.text, NO_OUTPUT_SENTINEL);
        assert_eq!(out.source, OutputSource::Sentinel);

        let out = CapturedOutput::select(None, None, None);
        assert_eq!(out.text, "No stdout or stderr");
    }
}
