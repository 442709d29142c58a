//! Jenkins MCP Server
//!
//! Exposes a Jenkins server's job, build and queue REST endpoints as MCP tools.
//! Every tool call is one authenticated round-trip (two for rebuild); nothing
//! is cached between calls.

pub mod config;
pub mod error;
pub mod jenkins_client;
pub mod tools;

pub use config::{Args, Config};
pub use error::{JenkinsError, Result};
pub use jenkins_client::JenkinsClient;
pub use tools::JenkinsToolHandler;

#[cfg(test)]
mod test_support;
