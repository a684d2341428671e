use std::fmt;

use crate::platform::ShellKind;

pub const POSIX_SHELL: &str = "/bin/bash";
pub const CMD_SHELL: &str = "cmd";
pub const POWERSHELL: &str = "powershell";

/// Switches the PowerShell console to UTF-8 without a byte-order mark before
/// the user command runs.
pub const POWERSHELL_UTF8_PREAMBLE: &str = "[Console]::InputEncoding = [System.Text.UTF8Encoding]::new($false);[Console]::OutputEncoding = [System.Text.UTF8Encoding]::new($false);";

/// Executable and arguments that make a shell run one command and exit.
///
/// The command is embedded verbatim. No escaping or validation happens here;
/// a command with unbalanced quotes produces whatever the shell makes of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub(crate) shell: ShellKind,
    pub(crate) program: String,
    pub(crate) args: Vec<String>,
}

impl InvocationSpec {
    pub fn build(command: &str, shell: ShellKind) -> Self {
        let (program, args) = match shell {
            ShellKind::Posix => (POSIX_SHELL, vec!["-c".to_string(), command.to_string()]),
            ShellKind::WindowsCmd => (
                CMD_SHELL,
                vec!["/U".to_string(), "/c".to_string(), command.to_string()],
            ),
            ShellKind::WindowsPowerShell => (
                POWERSHELL,
                vec![
                    "-Command".to_string(),
                    format!("{POWERSHELL_UTF8_PREAMBLE} {command}"),
                ],
            ),
        };

        Self {
            shell,
            program: program.to_string(),
            args,
        }
    }

    pub fn shell(&self) -> ShellKind {
        self.shell
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument vector handed to the program on POSIX hosts.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Single argument line, with the payload argument wrapped in double
    /// quotes. Windows children receive exactly this string.
    pub fn argument_string(&self) -> String {
        match self.args.split_last() {
            Some((payload, flags)) if !flags.is_empty() => {
                format!("{} \"{payload}\"", flags.join(" "))
            }
            Some((payload, _)) => format!("\"{payload}\""),
            None => String::new(),
        }
    }
}

impl fmt::Display for InvocationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.argument_string())
    }
}
