use clap::{Parser, ValueEnum};
use homelab_api_tools::config::TransportKind;
use std::path::PathBuf;

/// Serve the homelab API tools to an MCP client over stdio.
#[derive(Debug, Parser)]
#[command(name = "homelab-mcp-tools", version, about)]
pub struct Cli {
    /// YAML config file (defaults are used when omitted).
    #[arg(long, env = "HOMELAB_TOOLS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "HOMELAB_TOOLS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "HOMELAB_TOOLS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Override the transport from the config file.
    #[arg(long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Print the tool definitions as JSON and exit.
    #[arg(long)]
    pub list_tools: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Http,
    Curl,
}

impl From<TransportArg> for TransportKind {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Http => TransportKind::Http,
            TransportArg::Curl => TransportKind::Curl,
        }
    }
}
