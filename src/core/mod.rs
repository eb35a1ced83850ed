//! Waypoint storage – the in-memory mapping, its flat-file persistence and
//! the naming policy applied before writes.
//!
//! Nothing in this module touches the terminal except the interactive
//! [`policy::TerminalConfirm`].

pub mod policy;
pub mod record;
pub mod store;
