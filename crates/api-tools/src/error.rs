//! Error types for `homelab-api-tools`.

use thiserror::Error;

/// Failures that escape a tool call.
///
/// Missing credentials and transport failures are not errors at this level: they are turned
/// into error *responses* (see [`crate::response::ToolResponse`]). What remains here is what
/// the host runtime has to deal with itself.
#[derive(Error, Debug)]
pub enum ApiToolsError {
    /// Configuration errors (invalid base URL, unreadable config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Arguments did not match the tool's declared parameter schema.
    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    /// No tool registered under this name.
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// The remote system answered with a body we had to parse and could not.
    #[error("Malformed {system} payload: {message}")]
    MalformedPayload {
        system: &'static str,
        message: String,
    },

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for tool operations.
pub type Result<T> = std::result::Result<T, ApiToolsError>;
