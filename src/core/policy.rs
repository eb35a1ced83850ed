//! Naming policy applied before `set`.
//!
//! The store accepts any representable name.  Names that shadow a subcommand
//! are only stored after the user confirms, because `wp <name>` tries the
//! subcommands first and would never reach them.

use std::io::{self, BufRead, Write};

use crossterm::tty::IsTty;

use crate::error::{Result, WaypointError};

/// Subcommand names that the single-argument shorthand cannot reach.
pub const RESERVED_NAMES: &[&str] = &["go", "set", "rem", "peek", "ls", "list", "help"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

// ───────────────────────────────────────── confirmation ──────

/// Yes/no decision source for reserved-name overrides.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Asks on the terminal.  Declines without asking when stdin is not a
/// terminal, so scripted use never blocks.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let stdin = io::stdin();
        if !stdin.is_tty() {
            tracing::debug!("stdin is not a terminal, declining: {prompt}");
            return false;
        }

        // Prompt on stderr: the shell wrapper captures stdout.
        let mut err = io::stderr();
        let _ = write!(err, "{prompt} [y/N] ");
        let _ = err.flush();

        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return false;
        }
        parse_answer(&answer)
    }
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

// ───────────────────────────────────────── decision ──────────

/// Outcome of a successful name check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameApproval {
    Plain,
    /// Reserved, but the user confirmed storing it anyway.
    ReservedOverride,
}

/// Validate `name` for `set`, asking `confirm` when it is reserved.
pub fn approve_name(name: &str, confirm: &mut dyn Confirm) -> Result<NameApproval> {
    if name.is_empty() {
        return Err(WaypointError::InvalidArgument(
            "name must not be empty".into(),
        ));
    }
    if !is_reserved(name) {
        return Ok(NameApproval::Plain);
    }

    let prompt = format!("'{name}' is also a subcommand. Store it anyway?");
    if confirm.confirm(&prompt) {
        tracing::debug!("reserved name '{name}' confirmed");
        Ok(NameApproval::ReservedOverride)
    } else {
        Err(WaypointError::ReservedName {
            name: name.to_string(),
        })
    }
}
