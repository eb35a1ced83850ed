//! User configuration — store location and injection mode.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/waypoint/config.toml` (default `~/.config/waypoint/config.toml`).
//! The file is optional; every key has a default.

use std::path::{Path, PathBuf};

use crate::shell::inject::InjectMode;

/// Store filename placed beside the executable.
pub const DEFAULT_STORE_FILE: &str = "waypoint.db";

/// Filename used by older installs; picked up when it is the only one present.
pub const LEGACY_STORE_FILE: &str = "database.dat";

/// Environment variable overriding the store path.
pub const STORE_ENV: &str = "WAYPOINT_DB";

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Explicit store file location.
    pub store_path: Option<PathBuf>,
    /// How `go` reaches the shell.  `None` means the platform default.
    pub inject: Option<InjectMode>,
}

impl AppConfig {
    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => return Self::parse_config(&contents),
                Err(e) => tracing::warn!("ignoring unreadable config {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    pub fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "store_path" if !value.is_empty() => {
                    config.store_path = Some(PathBuf::from(value));
                }
                "inject" => match value.parse::<InjectMode>() {
                    Ok(mode) => config.inject = Some(mode),
                    Err(e) => tracing::warn!("config: {e}"),
                },
                _ => tracing::debug!("config: ignoring key '{key}'"),
            }
        }

        config
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# waypoint configuration".to_string(),
            String::new(),
            "# Store file (default: waypoint.db beside the executable)".to_string(),
        ];
        match &self.store_path {
            Some(p) => lines.push(format!("store_path = \"{}\"", p.display())),
            None => lines.push("# store_path = \"/path/to/waypoint.db\"".to_string()),
        }
        lines.push(String::new());
        lines.push("# How `go` changes directory: tiocsti, emit, off".to_string());
        match self.inject {
            Some(mode) => lines.push(format!("inject = \"{mode}\"")),
            None => lines.push(format!("# inject = \"{}\"", InjectMode::platform_default())),
        }
        lines.push(String::new());
        lines.join("\n")
    }

    /// Decide the store file.  Precedence: `--db` flag, `WAYPOINT_DB`, the
    /// `store_path` key, then `waypoint.db` beside the executable.
    pub fn resolve_store_path(&self, cli_db: Option<&Path>, env_db: Option<&str>) -> PathBuf {
        if let Some(p) = cli_db {
            return p.to_path_buf();
        }
        if let Some(p) = env_db.filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        if let Some(p) = &self.store_path {
            return p.clone();
        }
        store_beside(&install_dir())
    }

    /// Injection mode, with `--emit-cd` winning over the config.
    pub fn resolve_inject(&self, emit_cd: bool) -> InjectMode {
        if emit_cd {
            return InjectMode::Emit;
        }
        self.inject.unwrap_or_else(InjectMode::platform_default)
    }
}

/// `waypoint.db` in `dir`, or the legacy `database.dat` if only that exists.
pub fn store_beside(dir: &Path) -> PathBuf {
    let current = dir.join(DEFAULT_STORE_FILE);
    let legacy = dir.join(LEGACY_STORE_FILE);
    if !current.exists() && legacy.exists() {
        tracing::debug!("using legacy store {}", legacy.display());
        return legacy;
    }
    current
}

/// Directory holding the running executable (symlinks resolved).
fn install_dir() -> PathBuf {
    std::env::current_exe()
        .and_then(|exe| exe.canonicalize())
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Return the config file path (`$XDG_CONFIG_HOME/waypoint/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("waypoint").join("config.toml")
}
