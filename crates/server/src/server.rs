//! MCP server surface.
//!
//! Framing, the initialize handshake, request ids and `notifications/cancelled` are handled by
//! `rmcp`; each `tools/call` runs on its own task with a cancellation token that fires when the
//! client cancels the request or the session ends.

use homelab_api_tools::{ApiToolsError, ToolSet};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::{Map, Value};
use tracing::warn;

/// Serves the homelab tool set to one MCP client.
#[derive(Debug, Clone)]
pub struct HomelabServer {
    tools: ToolSet,
}

impl HomelabServer {
    #[must_use]
    pub fn new(tools: ToolSet) -> Self {
        Self { tools }
    }
}

/// Caller mistakes map to `invalid_params`; everything else is the server's problem.
fn to_error_data(err: &ApiToolsError) -> ErrorData {
    match err {
        ApiToolsError::UnknownTool(_) | ApiToolsError::InvalidArguments { .. } => {
            ErrorData::invalid_params(err.to_string(), None)
        }
        _ => ErrorData::internal_error(err.to_string(), None),
    }
}

impl ServerHandler for HomelabServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some("Homelab API tools".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Query Nautobot, check Proxmox guest status and launch AAP job templates."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools.list_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request
            .arguments
            .map_or_else(|| Value::Object(Map::new()), Value::Object);
        self.tools
            .call_tool(&request.name, arguments, &context.ct)
            .await
            .map_err(|e| {
                warn!(tool = %request.name, error = %e, "tool call failed");
                to_error_data(&e)
            })
    }
}
