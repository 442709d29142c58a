//! Jenkins MCP Server — Main Entry Point

use clap::Parser;
use tracing::{info, error, debug};
use tracing_subscriber::{EnvFilter, fmt};
use rmcp::{ServiceExt, transport::stdio};

use jenkins_mcp::{Args, Config, JenkinsToolHandler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    info!("Starting Jenkins MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    info!("Jenkins URL: {}", config.base_url);

    let service = JenkinsToolHandler::new(config)?
        .serve(stdio()).await.inspect_err(|e| {
            error!("Serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(false)
        .with_line_number(false);

    // stdout carries the MCP framing
    if let Some(log_file) = &args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        subscriber.with_writer(file).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    debug!("Logging initialized with level: {}", args.log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use jenkins_mcp::config::Args;

    #[test]
    fn test_args_parsing_defaults() {
        let args = Args::parse_from(["jenkins-mcp"]);
        assert_eq!(args.log_level, "info");
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_args_parsing_with_options() {
        let args = Args::parse_from([
            "jenkins-mcp",
            "--log-level", "debug",
            "--log-file", "/tmp/jenkins-mcp.log",
        ]);
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.log_file.unwrap().to_str().unwrap(), "/tmp/jenkins-mcp.log");
    }

    #[test]
    fn test_args_reject_connection_flags() {
        assert!(Args::try_parse_from(["jenkins-mcp", "--url", "http://x"]).is_err());
    }
}
