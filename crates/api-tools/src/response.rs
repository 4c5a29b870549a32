//! Normalized tool responses.

use rmcp::model::{CallToolResult, Content};
use serde_json::{Map, Value};

/// Key under which successful responses repeat the raw remote text in `structuredContent`.
pub const RAW_DETAILS_KEY: &str = "raw";

/// Result of one tool call: pass-through text or a human-readable error. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResponse {
    Success { text: String },
    Error { message: String },
}

impl ToolResponse {
    /// Remote output, forwarded verbatim.
    #[must_use]
    pub fn passthrough(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn missing_credential(var: &str) -> Self {
        Self::error(format!("Error: {var} not found in environment."))
    }

    #[must_use]
    pub fn api_error(system: &str, stderr: &str) -> Self {
        Self::error(format!("Error calling {system} API: {stderr}"))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Error { message } => message,
        }
    }
}

impl From<ToolResponse> for CallToolResult {
    fn from(value: ToolResponse) -> Self {
        match value {
            ToolResponse::Success { text } => {
                let mut details = Map::new();
                details.insert(RAW_DETAILS_KEY.to_string(), Value::String(text.clone()));
                CallToolResult {
                    content: vec![Content::text(text)],
                    structured_content: Some(Value::Object(details)),
                    is_error: Some(false),
                    meta: None,
                }
            }
            ToolResponse::Error { message } => CallToolResult::error(vec![Content::text(message)]),
        }
    }
}
