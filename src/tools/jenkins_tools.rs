//! RMCP 0.3.2 implementation for Jenkins MCP tools
//!
//! Provides 8 tools covering job and build inspection, console logs,
//! build triggering (plain, parameterized, rebuild) and queue lookups.

use rmcp::{
    tool, tool_router, tool_handler, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    ErrorData as McpError,
    service::RequestContext,
    RoleServer,
};
use serde_json::Value;
use tracing::info;
use std::future::Future;

use super::types::*;
use crate::config::Config;
use crate::jenkins_client::{queue_id_from_location, JenkinsClient};

/// Console output beyond this many characters is cut from the front
pub const MAX_CONSOLE_CHARS: usize = 100_000;

pub const TRUNCATION_MARKER: &str = "[... output truncated, showing last 100000 characters ...]\n";

/// Jenkins tool handler
#[derive(Clone)]
pub struct JenkinsToolHandler {
    #[allow(dead_code)]
    tool_router: ToolRouter<JenkinsToolHandler>,
    config: Config,
    client: JenkinsClient,
}

impl JenkinsToolHandler {
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = JenkinsClient::new(&config)?;
        Ok(Self {
            tool_router: Self::tool_router(),
            config,
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn make_error(msg: impl Into<String>) -> McpError {
    McpError::internal_error(msg.into(), None)
}

fn require(field: &str, value: &str) -> Result<(), McpError> {
    if value.trim().is_empty() {
        return Err(McpError::invalid_params(
            format!("{} cannot be empty", field),
            None,
        ));
    }
    Ok(())
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| make_error(e.to_string()))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Keep the last `count` newline-separated lines
fn tail_lines(output: &str, count: usize) -> String {
    let lines: Vec<&str> = output.split('\n').collect();
    if lines.len() <= count {
        return output.to_string();
    }
    lines[lines.len() - count..].join("\n")
}

/// Keep the trailing `MAX_CONSOLE_CHARS` characters behind a marker
fn truncate_console(output: String) -> String {
    let total = output.chars().count();
    if total <= MAX_CONSOLE_CHARS {
        return output;
    }
    let start = output
        .char_indices()
        .nth(total - MAX_CONSOLE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(0);
    format!("{}{}", TRUNCATION_MARKER, &output[start..])
}

/// Describe where a triggered build was queued
fn queue_message(location: Option<&str>) -> String {
    match location {
        Some(url) => {
            let mut message = format!("Queue URL: {}", url);
            if let Some(id) = queue_id_from_location(url) {
                message.push_str(&format!(
                    "\nQueue item ID: {}\n\
                     Use get_queue_item with this ID to see when the build starts and which build number it gets.",
                    id
                ));
            }
            message
        }
        None => "Queue URL: unknown (Jenkins did not return a Location header)".to_string(),
    }
}

#[tool_router]
impl JenkinsToolHandler {
    // =========================================================================
    // Inspection (4 tools)
    // =========================================================================

    #[tool(description = "Get a Jenkins job's status as JSON. Nested jobs use '/' (e.g. 'team/app'). Optional 'tree' narrows the returned fields.")]
    async fn get_job_info(&self, Parameters(args): Parameters<GetJobInfoArgs>) -> Result<CallToolResult, McpError> {
        require("job", &args.job)?;

        let info = self.client.job_info(&args.job, args.tree.as_deref())
            .await.map_err(|e| make_error(e.to_string()))?;

        json_result(&info)
    }

    #[tool(description = "Get details of a build as JSON. 'build' is a number or lastBuild / lastSuccessfulBuild / lastFailedBuild (default: lastBuild).")]
    async fn get_build_info(&self, Parameters(args): Parameters<GetBuildInfoArgs>) -> Result<CallToolResult, McpError> {
        require("job", &args.job)?;

        let info = self.client.build_info(&args.job, &args.build, args.tree.as_deref())
            .await.map_err(|e| make_error(e.to_string()))?;

        json_result(&info)
    }

    #[tool(description = "List the parameter definitions of a job (name, type, default, choices)")]
    async fn get_params(&self, Parameters(args): Parameters<GetParamsArgs>) -> Result<CallToolResult, McpError> {
        require("job", &args.job)?;

        let definitions = self.client.parameter_definitions(&args.job)
            .await.map_err(|e| make_error(e.to_string()))?;

        if definitions.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "No parameters defined for job '{}'", args.job
            ))]));
        }

        json_result(&Value::Array(definitions))
    }

    #[tool(description = "Get the console log of a build. 'tail' keeps only the last N lines; logs over 100000 characters keep only the end.")]
    async fn get_console_output(&self, Parameters(args): Parameters<GetConsoleOutputArgs>) -> Result<CallToolResult, McpError> {
        require("job", &args.job)?;

        let mut output = self.client.console_text(&args.job, &args.build)
            .await.map_err(|e| make_error(e.to_string()))?;

        if let Some(count) = args.tail {
            output = tail_lines(&output, count);
        }

        Ok(CallToolResult::success(vec![Content::text(truncate_console(output))]))
    }

    // =========================================================================
    // Triggering (3 tools)
    // =========================================================================

    #[tool(description = "Trigger a build of a job without parameters. Returns the queue URL.")]
    async fn build(&self, Parameters(args): Parameters<BuildArgs>) -> Result<CallToolResult, McpError> {
        require("job", &args.job)?;
        info!("Triggering build of '{}'", args.job);

        let location = self.client.trigger_build(&args.job)
            .await.map_err(|e| make_error(e.to_string()))?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Build triggered for job '{}'\n{}",
            args.job,
            queue_message(location.as_deref()),
        ))]))
    }

    #[tool(description = "Trigger a build of a parameterized job with the given name/value parameters. Returns the queue URL.")]
    async fn build_with_params(&self, Parameters(args): Parameters<BuildWithParamsArgs>) -> Result<CallToolResult, McpError> {
        require("job", &args.job)?;
        info!("Triggering build of '{}' with {} parameters", args.job, args.parameters.len());

        let location = self.client.trigger_build_with_params(&args.job, &args.parameters)
            .await.map_err(|e| make_error(e.to_string()))?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Build triggered for job '{}' with parameters: {}\n{}",
            args.job,
            serde_json::to_string(&args.parameters).map_err(|e| make_error(e.to_string()))?,
            queue_message(location.as_deref()),
        ))]))
    }

    #[tool(description = "Re-run a previous build with the same parameters it was started with. Falls back to a plain build when it had none.")]
    async fn rebuild(&self, Parameters(args): Parameters<RebuildArgs>) -> Result<CallToolResult, McpError> {
        require("job", &args.job)?;

        let params = self.client.build_parameters(&args.job, args.build_number)
            .await.map_err(|e| make_error(e.to_string()))?;

        info!("Rebuilding '{}' #{} with {} parameters", args.job, args.build_number, params.len());

        let (location, used) = if params.is_empty() {
            let location = self.client.trigger_build(&args.job)
                .await.map_err(|e| make_error(e.to_string()))?;
            (location, "no parameters".to_string())
        } else {
            let location = self.client.trigger_build_with_params(&args.job, &params)
                .await.map_err(|e| make_error(e.to_string()))?;
            let used = serde_json::to_string_pretty(&params).map_err(|e| make_error(e.to_string()))?;
            (location, format!("parameters:\n{}", used))
        };

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Rebuild of '{}' #{} triggered with {}\n{}",
            args.job,
            args.build_number,
            used,
            queue_message(location.as_deref()),
        ))]))
    }

    // =========================================================================
    // Queue (1 tool)
    // =========================================================================

    #[tool(description = "Get a queue item as JSON. Once the build has started it includes executable.number.")]
    async fn get_queue_item(&self, Parameters(args): Parameters<GetQueueItemArgs>) -> Result<CallToolResult, McpError> {
        require("queue_id", &args.queue_id)?;

        let item = self.client.queue_item(&args.queue_id)
            .await.map_err(|e| make_error(e.to_string()))?;

        json_result(&item)
    }
}

const TOOL_COUNT: usize = 8;

#[tool_handler]
impl ServerHandler for JenkinsToolHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Jenkins MCP Server - job, build and queue access for {}. \
                 {} tools available: get_job_info, get_build_info, get_params, \
                 get_console_output, build, build_with_params, rebuild, get_queue_item. \
                 Jobs inside folders are named with '/', e.g. 'team/app'.",
                self.config.base_url,
                TOOL_COUNT,
            )),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        info!("Jenkins MCP server initialized with {} tools", TOOL_COUNT);
        Ok(self.get_info())
    }
}
