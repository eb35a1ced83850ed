//! Wrapper shell functions for terminals that refuse `TIOCSTI`.
//!
//! In `--emit-cd` mode `go` prints a single machine-readable line instead of
//! typing into the terminal; the wrapper function picks it up, performs the
//! `cd` itself and echoes every other line unchanged.

use std::io::{self, Write};

/// Binary name the wrapper invokes.
pub const BIN_NAME: &str = "wp";

pub const CD_PREFIX: &str = "__WP_CD__=";

/// The payload line for `path`, without newline.
pub fn cd_payload(path: &str) -> String {
    format!("{CD_PREFIX}{path}")
}

/// Emit the machine-readable cd payload for the shell wrapper.
pub fn print_cd_payload(path: &str) {
    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{}", cd_payload(path)).and_then(|_| out.flush()) {
        tracing::debug!("failed to emit cd payload: {e}");
    }
}

/// Returns the bash function that users should add to their `.bashrc`.
pub fn bash_function() -> String {
    let bin = BIN_NAME;
    format!(
        r#"
# ── {bin}: directory waypoints ─────────────────────────────
# `{bin} <name>` jumps to a waypoint without relying on TIOCSTI.
{bin}() {{
    local output
    output="$(command {bin} --emit-cd "$@")"
    local exit_code=$?
    local dest=""
    while IFS= read -r line; do
        case "$line" in
            {CD_PREFIX}*) dest="${{line#{CD_PREFIX}}}" ;;
            *) [ -n "$line" ] && printf '%s\n' "$line" ;;
        esac
    done <<< "$output"
    if [ $exit_code -eq 0 ] && [ -n "$dest" ]; then
        cd -- "$dest" || return
    fi
    return $exit_code
}}
"#
    )
}

/// Returns the zsh function that users should add to their `.zshrc`.
pub fn zsh_function() -> String {
    let bin = BIN_NAME;
    format!(
        r#"
# ── {bin}: directory waypoints ─────────────────────────────
# `{bin} <name>` jumps to a waypoint without relying on TIOCSTI.
{bin}() {{
    local output
    output="$(command {bin} --emit-cd "$@")"
    local exit_code=$?
    local dest=""
    local line
    while IFS= read -r line; do
        case "$line" in
            {CD_PREFIX}*) dest="${{line#{CD_PREFIX}}}" ;;
            *) [[ -n "$line" ]] && printf '%s\n' "$line" ;;
        esac
    done <<< "$output"
    if [[ $exit_code -eq 0 ]] && [[ -n "$dest" ]]; then
        cd -- "$dest"
    fi
    return $exit_code
}}
"#
    )
}
