use anyhow::{Context, Result};
use clap::Parser;
use job_post_agent::app_log;
use job_post_agent::cli::{handle_command, JobPostCli};
use job_post_agent::config::ConfigManager;
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = JobPostCli::parse();

    let mut config = ConfigManager::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url.clone() {
        config = config.with_api_url(url)?;
    }

    // Logs go to a file so command output stays clean
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    app_log!(info, "API base URL: {}", config.api_base_url);
    app_log!(info, "Token cache: {}", config.token_path.display());

    handle_command(cli, config).await
}
