//! POSIX shell quoting.
//!
//! Produces a single word that any POSIX `sh` parses back to exactly the
//! input string, with no expansion of any kind.

/// Characters that never need quoting.
fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-' | '_')
}

/// Quote `s` as one shell word.
///
/// Safe strings pass through unchanged; everything else is wrapped in single
/// quotes, with each embedded `'` written as `'"'"'`.
pub fn quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(is_safe) {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// `cd <path>\n`, ready to be typed into a shell.
pub fn cd_command(path: &str) -> String {
    format!("cd {}\n", quote(path))
}
