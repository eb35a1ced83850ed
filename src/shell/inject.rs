//! Changing the *parent* shell's working directory.
//!
//! A child process cannot change its parent's cwd.  On terminals that allow
//! it, we push `cd <path>\n` into the terminal's input queue with `TIOCSTI`;
//! the shell reading that terminal then runs it after we exit.  Local echo is
//! switched off while the keystrokes are queued so they are not printed
//! twice, and switched back on by an echo guard's `Drop` on every path.
//!
//! Injection is best-effort.  Every failure is logged at `debug` and
//! swallowed: the user just has to `cd` by hand.

use std::fmt;
use std::str::FromStr;

use super::{integration, quote};
use crate::error::{Result, WaypointError};

// ───────────────────────────────────────── capability ────────

/// Something that can make the interactive shell run a command line.
pub trait ShellInjector {
    /// Attempt the injection, reporting why it failed.
    fn try_inject(&self, command_line: &str) -> Result<()>;

    /// Best-effort injection; failures are logged and dropped.
    fn inject_command(&self, command_line: &str) {
        if let Err(e) = self.try_inject(command_line) {
            tracing::debug!("injection skipped: {e}");
        }
    }

    /// Make the shell `cd` into `path` (quoted as a single word).  Only
    /// absolute paths are typed; `cd -` would jump to `$OLDPWD` instead.
    fn change_directory(&self, path: &str) {
        if !path.starts_with('/') {
            tracing::debug!("not injecting cd to non-absolute path {path:?}");
            return;
        }
        self.inject_command(&quote::cd_command(path));
    }
}

/// Refuse command lines the terminal line discipline would act on (erase,
/// interrupt, EOF and the like).  A single trailing newline is allowed.
pub fn check_injectable(command_line: &str) -> Result<()> {
    let body = command_line.strip_suffix('\n').unwrap_or(command_line);
    match body.chars().find(|c| c.is_control()) {
        Some(c) => Err(WaypointError::InjectionUnavailable(format!(
            "refusing to type control character {c:?}"
        ))),
        None => Ok(()),
    }
}

// ───────────────────────────────────────── mode ──────────────

/// How `go` hands the target directory to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectMode {
    /// Type `cd …` into the controlling terminal.
    Tiocsti,
    /// Print a payload line for the shell wrapper function.
    Emit,
    /// Do nothing.
    Off,
}

impl InjectMode {
    /// Best mode this build supports.
    pub fn platform_default() -> Self {
        if TIOCSTI_SUPPORTED {
            Self::Tiocsti
        } else {
            Self::Off
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tiocsti => "tiocsti",
            Self::Emit => "emit",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for InjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InjectMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tiocsti" | "tty" => Ok(Self::Tiocsti),
            "emit" | "wrapper" => Ok(Self::Emit),
            "off" | "none" => Ok(Self::Off),
            other => Err(format!("unknown inject mode '{other}'")),
        }
    }
}

/// Build the injector for `mode`.
pub fn select(mode: InjectMode) -> Box<dyn ShellInjector> {
    match mode {
        InjectMode::Tiocsti if TIOCSTI_SUPPORTED => Box::new(TiocstiInjector),
        InjectMode::Tiocsti => {
            tracing::debug!("tiocsti not supported on this platform, injection disabled");
            Box::new(NoopInjector)
        }
        InjectMode::Emit => Box::new(EmitInjector),
        InjectMode::Off => Box::new(NoopInjector),
    }
}

// ───────────────────────────────────────── no-op / emit ──────

/// Never navigates.
#[derive(Debug, Default)]
pub struct NoopInjector;

impl ShellInjector for NoopInjector {
    fn try_inject(&self, _command_line: &str) -> Result<()> {
        Err(WaypointError::InjectionUnavailable(
            "injection disabled".into(),
        ))
    }
}

/// Hands the directory to the `--init-bash` / `--init-zsh` wrapper on stdout.
#[derive(Debug, Default)]
pub struct EmitInjector;

impl ShellInjector for EmitInjector {
    fn try_inject(&self, _command_line: &str) -> Result<()> {
        Err(WaypointError::InjectionUnavailable(
            "wrapper mode only carries directory changes".into(),
        ))
    }

    fn change_directory(&self, path: &str) {
        integration::print_cd_payload(path);
    }
}

// ───────────────────────────────────────── TIOCSTI ───────

/// Types into the controlling terminal behind standard output.
#[derive(Debug, Default)]
pub struct TiocstiInjector;

impl ShellInjector for TiocstiInjector {
    fn try_inject(&self, command_line: &str) -> Result<()> {
        tty::inject(command_line)
    }
}

const TIOCSTI_SUPPORTED: bool = tty::SUPPORTED;

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
mod tty {
    use std::io;
    use std::os::fd::{AsFd, AsRawFd, BorrowedFd};

    use crossterm::tty::IsTty;
    use nix::sys::termios::{self, LocalFlags, SetArg, Termios};

    use crate::error::{Result, WaypointError};

    pub const SUPPORTED: bool = true;

    nix::ioctl_write_ptr_bad!(tiocsti, nix::libc::TIOCSTI, nix::libc::c_char);

    fn unavailable(what: &str, e: impl std::fmt::Display) -> WaypointError {
        WaypointError::InjectionUnavailable(format!("{what}: {e}"))
    }

    /// Echo switched off on `fd`'s terminal until dropped.
    pub struct EchoGuard<'fd> {
        fd: BorrowedFd<'fd>,
        original: Termios,
    }

    impl<'fd> EchoGuard<'fd> {
        pub fn disable(fd: BorrowedFd<'fd>) -> Result<Self> {
            let original = termios::tcgetattr(fd).map_err(|e| unavailable("tcgetattr", e))?;
            let mut silent = original.clone();
            silent.local_flags.remove(LocalFlags::ECHO);
            termios::tcsetattr(fd, SetArg::TCSANOW, &silent)
                .map_err(|e| unavailable("tcsetattr", e))?;
            Ok(Self { fd, original })
        }
    }

    impl Drop for EchoGuard<'_> {
        fn drop(&mut self) {
            if let Err(e) = termios::tcsetattr(self.fd, SetArg::TCSANOW, &self.original) {
                tracing::warn!("failed to restore terminal echo: {e}");
            }
        }
    }

    pub fn inject(command_line: &str) -> Result<()> {
        let stdout = io::stdout();
        if !stdout.is_tty() {
            return Err(WaypointError::InjectionUnavailable(
                "stdout is not a terminal".into(),
            ));
        }
        inject_into(stdout.as_fd(), command_line)
    }

    /// Queue `command_line` on the input of the terminal behind `fd`.
    pub fn inject_into(fd: BorrowedFd<'_>, command_line: &str) -> Result<()> {
        super::check_injectable(command_line)?;

        let _echo = EchoGuard::disable(fd)?;
        for byte in command_line.bytes() {
            let c = byte as nix::libc::c_char;
            // SAFETY: `fd` is borrowed for the whole loop; `c` outlives the call.
            unsafe { tiocsti(fd.as_raw_fd(), &c) }.map_err(|e| unavailable("TIOCSTI", e))?;
        }
        Ok(())
    }

}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
)))]
mod tty {
    use crate::error::{Result, WaypointError};

    pub const SUPPORTED: bool = false;

    pub fn inject(_command_line: &str) -> Result<()> {
        Err(WaypointError::InjectionUnavailable(
            "TIOCSTI is not available on this platform".into(),
        ))
    }
}
