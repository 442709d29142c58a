//! Jenkins MCP tools module
//!
//! One handler exposes the job, build and queue tools using the RMCP 0.3.2
//! router macros.

pub mod jenkins_tools;
pub mod types;

pub use jenkins_tools::*;
pub use types::*;
