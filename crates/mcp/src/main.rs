mod protocol;
mod server;
mod tools;

use anyhow::Context;
use larder_core::config::ENV_CONFIG_PATH;
use larder_core::LarderConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::tools::Toolbox;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ENV_CONFIG_PATH).ok())
        .map(PathBuf::from);
    let config = LarderConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    let toolbox = Toolbox::from_config(&config).await?;
    tracing::info!("{} MCP server ready on stdio", server::SERVER_NAME);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server::serve(&toolbox, stdin, tokio::io::stdout())
        .await
        .context("stdio transport failed")?;
    Ok(())
}
