//! Getting the calling shell to change directory.
//!
//! Two routes exist.  By default the binary types `cd <path>` straight into
//! the controlling terminal ([`inject`]).  Where the kernel forbids that, the
//! wrapper functions from [`integration`] run the binary in `--emit-cd` mode
//! and do the `cd` themselves.

pub mod inject;
pub mod integration;
pub mod quote;
