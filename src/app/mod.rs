//! Application orchestration — command model and execution.

pub mod command;
pub mod handler;
