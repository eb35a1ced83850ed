//! Parsed user intent, independent of how the CLI spelled it.

use std::path::PathBuf;

/// One invocation's worth of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Jump to a waypoint (also the bare `wp <name>` form).
    Go { name: String },
    /// Bookmark `path` (the caller's cwd) under `name`.
    Set { name: String, path: PathBuf },
    Rem { name: String },
    /// Print the stored path without navigating.
    Peek { name: String },
    Ls,
    /// No arguments at all.
    Hint,
}

impl Command {
    /// Subcommand word for logging.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Go { .. } => "go",
            Command::Set { .. } => "set",
            Command::Rem { .. } => "rem",
            Command::Peek { .. } => "peek",
            Command::Ls => "ls",
            Command::Hint => "hint",
        }
    }
}
