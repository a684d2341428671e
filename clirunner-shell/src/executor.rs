use crate::capture::{CapturedOutput, capture};
use crate::encoding::EncodingAssignment;
use crate::error::{Result, RunnerError};
use crate::invocation::InvocationSpec;
use crate::launcher::launch;
use crate::request::CommandRequest;

/// Trait implemented by concrete command execution strategies.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, request: &CommandRequest) -> Result<CapturedOutput>;
}

/// Runs each request in a fresh child process through the selected shell.
///
/// Every call is self-contained: no state is shared between calls, so one
/// executor can serve any number of threads at once.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCommandExecutor;

impl ProcessCommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Async form of [`CommandExecutor::execute`] for hosts that already run
    /// a Tokio runtime.
    pub async fn execute_async(&self, request: &CommandRequest) -> Result<CapturedOutput> {
        let options = request.options;
        if options.use_shell_execute && options.redirection.any() {
            return Err(RunnerError::ShellExecuteRedirect);
        }

        let invocation = InvocationSpec::build(&request.command, request.shell);
        let encodings = EncodingAssignment::select(request.shell, options.force_utf8);
        tracing::debug!(
            %invocation,
            stdin = %encodings.stdin,
            stdout = %encodings.stdout,
            stderr = %encodings.stderr,
            wait_for_exit = options.wait_for_exit,
            "launching command"
        );

        let process = launch(&invocation, encodings, request)?;
        capture(process).await
    }
}

impl CommandExecutor for ProcessCommandExecutor {
    /// Blocks the calling thread on a current-thread runtime built for this
    /// call alone. Must not be called from inside another Tokio runtime.
    fn execute(&self, request: &CommandRequest) -> Result<CapturedOutput> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RunnerError::Runtime)?;
        runtime.block_on(self.execute_async(request))
    }
}
