//! Type definitions for Jenkins MCP tools

use std::collections::BTreeMap;

use serde::Deserialize;
use schemars::JsonSchema;

use crate::jenkins_client::LAST_BUILD;

fn default_build_ref() -> String { LAST_BUILD.to_string() }

// ============================================================================
// get_job_info
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetJobInfoArgs {
    /// Job name; use '/' to address jobs inside folders (e.g. "team/app")
    pub job: String,
    /// Jenkins tree filter limiting returned fields (e.g. "name,color,lastBuild[number]")
    #[serde(default)]
    pub tree: Option<String>,
}

// ============================================================================
// get_build_info
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetBuildInfoArgs {
    /// Job name; use '/' to address jobs inside folders
    pub job: String,
    /// Build number or alias: lastBuild, lastSuccessfulBuild, lastFailedBuild (default: lastBuild)
    #[serde(default = "default_build_ref")]
    pub build: String,
    /// Jenkins tree filter limiting returned fields
    #[serde(default)]
    pub tree: Option<String>,
}

// ============================================================================
// get_params
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetParamsArgs {
    /// Job name; use '/' to address jobs inside folders
    pub job: String,
}

// ============================================================================
// get_console_output
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetConsoleOutputArgs {
    /// Job name; use '/' to address jobs inside folders
    pub job: String,
    /// Build number or alias (default: lastBuild)
    #[serde(default = "default_build_ref")]
    pub build: String,
    /// Only return the last N lines of the log
    #[serde(default)]
    pub tail: Option<usize>,
}

// ============================================================================
// build
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BuildArgs {
    /// Job name; use '/' to address jobs inside folders
    pub job: String,
}

// ============================================================================
// build_with_params
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BuildWithParamsArgs {
    /// Job name; use '/' to address jobs inside folders
    pub job: String,
    /// Build parameters as name/value pairs
    pub parameters: BTreeMap<String, String>,
}

// ============================================================================
// rebuild
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RebuildArgs {
    /// Job name; use '/' to address jobs inside folders
    pub job: String,
    /// Number of the build whose parameters are reused
    pub build_number: u64,
}

// ============================================================================
// get_queue_item
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetQueueItemArgs {
    /// Queue item ID, as returned by build, build_with_params or rebuild
    pub queue_id: String,
}
