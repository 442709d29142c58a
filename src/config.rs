//! Configuration for the jenkins-mcp server

use std::path::PathBuf;
use clap::Parser;

pub const URL_VAR: &str = "JENKINS_URL";
pub const USER_VAR: &str = "JENKINS_USER";
pub const TOKEN_VAR: &str = "JENKINS_API_TOKEN";

/// Command line arguments
///
/// Only logging is configurable here. The Jenkins connection comes from the
/// environment (see [`Config::from_env`]).
#[derive(Parser, Debug)]
#[command(name = "jenkins-mcp")]
#[command(about = "MCP server for the Jenkins REST API")]
#[command(version)]
pub struct Args {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file path (defaults to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Runtime configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Jenkins root URL without trailing slashes
    pub base_url: String,
    pub username: String,
    pub api_token: String,
}

impl Config {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, api_token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            api_token: api_token.into(),
        }
    }

    /// Read `JENKINS_URL`, `JENKINS_USER` and `JENKINS_API_TOKEN`.
    ///
    /// Missing variables are left empty; bad credentials surface as a 401
    /// from Jenkins on the first call.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(
            lookup(URL_VAR).unwrap_or_default(),
            lookup(USER_VAR).unwrap_or_default(),
            lookup(TOKEN_VAR).unwrap_or_default(),
        )
    }
}
