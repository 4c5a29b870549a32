mod cli;
mod logging;
mod server;

use anyhow::Context as _;
use clap::Parser as _;
use cli::Cli;
use homelab_api_tools::ToolSet;
use homelab_api_tools::config::load_config;
use rmcp::ServiceExt as _;
use server::HomelabServer;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level, cli.log_format);

    let mut config = load_config(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("load config from {}", path.display()),
        None => "load default config".to_string(),
    })?;
    if let Some(transport) = cli.transport {
        config.transport = transport.into();
    }

    let tools = ToolSet::from_config(&config).context("build tool set")?;

    if cli.list_tools {
        let listing = serde_json::to_string_pretty(&tools.list_tools())?;
        println!("{listing}");
        return Ok(());
    }

    info!(
        tools = ?tools.tool_names(),
        transport = ?config.transport,
        "serving MCP over stdio"
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            signal_token.cancel();
        }
    });

    let running = HomelabServer::new(tools)
        .serve_with_ct(rmcp::transport::stdio(), shutdown.clone())
        .await
        .context("MCP initialize handshake")?;
    let reason = running.waiting().await.context("MCP session task")?;
    info!(?reason, "MCP session ended");

    if shutdown.is_cancelled() {
        // The blocking stdin reader would otherwise hold runtime shutdown open.
        std::process::exit(0);
    }
    Ok(())
}
