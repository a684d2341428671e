use crate::environment::EnvironmentOverrides;
use crate::platform::ShellKind;

/// Which standard streams are piped between the library and the child.
/// Streams that are not redirected are inherited from the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Redirection {
    pub stdin: bool,
    pub stdout: bool,
    pub stderr: bool,
}

impl Redirection {
    pub const NONE: Self = Self {
        stdin: false,
        stdout: false,
        stderr: false,
    };

    pub const ALL: Self = Self {
        stdin: true,
        stdout: true,
        stderr: true,
    };

    pub const fn any(self) -> bool {
        self.stdin || self.stdout || self.stderr
    }
}

/// Launch switches for a single command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Block until the child exits. Without it, reads of redirected streams
    /// still run to end-of-stream and may block on a long-lived child.
    pub wait_for_exit: bool,
    pub redirection: Redirection,
    /// Ask for an OS shell-integration launch. Incompatible with redirection.
    pub use_shell_execute: bool,
    /// Suppress the console window on Windows. Inert elsewhere.
    pub create_no_window: bool,
    /// Bind every stream to UTF-8 regardless of the shell's default.
    pub force_utf8: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            wait_for_exit: true,
            redirection: Redirection::ALL,
            use_shell_execute: false,
            create_no_window: true,
            force_utf8: false,
        }
    }
}

/// Everything needed to run one command. Owns copies of the caller's text so
/// foreign memory can be released as soon as the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub command: String,
    pub shell: ShellKind,
    pub environment: Option<EnvironmentOverrides>,
    /// Written to the child's stdin through the stdin encoding when stdin is
    /// redirected. Stdin is closed afterwards either way.
    pub stdin: Option<String>,
    pub options: RunOptions,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>, shell: ShellKind) -> Self {
        Self {
            command: command.into(),
            shell,
            environment: None,
            stdin: None,
            options: RunOptions::default(),
        }
    }

    pub fn with_environment(mut self, environment: EnvironmentOverrides) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_redirection(mut self, redirection: Redirection) -> Self {
        self.options.redirection = redirection;
        self
    }

    pub fn wait_for_exit(mut self, wait: bool) -> Self {
        self.options.wait_for_exit = wait;
        self
    }
}
