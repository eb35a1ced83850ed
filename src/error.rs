//! Error taxonomy shared by the store, the naming policy and the injector.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while resolving or mutating waypoints.
#[derive(Error, Debug)]
pub enum WaypointError {
    /// The name is not in the store (`go`, `peek`, `rem`).
    #[error("No such waypoint!")]
    NotFound { name: String },

    /// The name or path cannot be stored (empty, not UTF-8, framing or control characters).
    #[error("Invalid waypoint: {0}")]
    InvalidArgument(String),

    /// The name collides with a built-in subcommand and was not confirmed.
    #[error("Unallowed waypoint name '{name}' (collides with a subcommand)")]
    ReservedName { name: String },

    /// A non-empty store line lacks the `" => "` separator.
    #[error("corrupt database {}: line {line} has no ' => ' separator: {content:?}", path.display())]
    StoreCorrupt {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    /// Terminal input injection is not possible here. Never shown to users.
    #[error("terminal injection unavailable: {0}")]
    InjectionUnavailable(String),
}

impl WaypointError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// `true` for the errors the CLI reports as a plain one-line message and
    /// still exits 0 for.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::InvalidArgument(_) | Self::ReservedName { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WaypointError>;
