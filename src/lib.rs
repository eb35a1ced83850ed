//! Directory waypoints.
//!
//! Name a directory once with `wp set <name>`, then `wp <name>` from any
//! shell to jump back.  Waypoints live in a flat `name => path` file
//! ([`core::store`]); the jump itself is typed into the controlling terminal
//! so the parent shell performs the `cd` ([`shell::inject`]).

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod shell;

pub use error::{Result, WaypointError};
