//! Host classification.
//!
//! Every other component consumes [`ShellKind`]; nothing outside this module
//! asks the compiler or the OS which family it is running on.

/// Operating-system family, as far as shell selection is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFamily {
    /// Linux, macOS and the other Unix targets. Commands run under bash.
    Posix,
    /// Windows. Commands run under `cmd` or PowerShell.
    Windows,
}

impl HostFamily {
    /// Family of the host this library was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }
}

/// Shell family used to execute a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellKind {
    Posix,
    WindowsCmd,
    WindowsPowerShell,
}

impl ShellKind {
    /// Resolve the shell for `host`. The PowerShell preference is ignored on
    /// POSIX hosts, which always run bash.
    pub const fn classify(host: HostFamily, prefer_powershell: bool) -> Self {
        match host {
            HostFamily::Posix => Self::Posix,
            HostFamily::Windows if prefer_powershell => Self::WindowsPowerShell,
            HostFamily::Windows => Self::WindowsCmd,
        }
    }

    /// [`classify`](Self::classify) against the current host.
    pub const fn detect(prefer_powershell: bool) -> Self {
        Self::classify(HostFamily::current(), prefer_powershell)
    }

    pub const fn is_windows(self) -> bool {
        matches!(self, Self::WindowsCmd | Self::WindowsPowerShell)
    }
}
