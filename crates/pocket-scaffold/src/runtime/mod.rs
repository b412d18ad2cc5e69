//! External tool detection
//!
//! Post-generation actions shell out to git and package managers. This
//! module reports which of them are installed before a run starts.

pub mod check;

pub use check::{check_tool, check_tools, required_tools, ToolInfo};
