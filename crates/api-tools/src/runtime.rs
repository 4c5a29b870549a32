//! Tool set: the registry the host-facing server lists and dispatches through.

use crate::adapter::ApiTool;
use crate::config::ToolsConfig;
use crate::credentials::Credentials;
use crate::error::{ApiToolsError, Result};
use crate::semantics::annotations_for;
use crate::tools::{AapLaunchTool, NautobotQueryTool, PveStatusTool};
use crate::transport::{Transport, build_transport};
use rmcp::model::{CallToolResult, JsonObject, Tool};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Clone)]
pub struct ToolSet {
    inner: Arc<ToolSetInner>,
}

struct ToolSetInner {
    tools: Vec<Box<dyn ApiTool>>,
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("tools", &self.tool_names())
            .finish()
    }
}

impl ToolSet {
    /// Build the Nautobot, Proxmox and AAP tools over a shared transport.
    ///
    /// The resulting instance is immutable and safe to share across tasks.
    #[must_use]
    pub fn new(
        config: &ToolsConfig,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let tools: Vec<Box<dyn ApiTool>> = vec![
            Box::new(NautobotQueryTool::new(
                &config.nautobot,
                credentials.nautobot_token,
                transport.clone(),
            )),
            Box::new(PveStatusTool::new(
                &config.proxmox,
                credentials.proxmox_token,
                transport.clone(),
            )),
            Box::new(AapLaunchTool::new(
                &config.aap,
                credentials.aap_password,
                transport,
            )),
        ];
        Self::from_tools(tools)
    }

    /// Build from the environment and the transport named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be built.
    pub fn from_config(config: &ToolsConfig) -> Result<Self> {
        let credentials = Credentials::from_env(config);
        for var in credentials.missing_vars() {
            info!(var, "credential not set; tools that need it will return an error");
        }
        let transport = build_transport(config)?;
        Ok(Self::new(config, credentials, transport))
    }

    #[must_use]
    pub fn from_tools(tools: Vec<Box<dyn ApiTool>>) -> Self {
        Self {
            inner: Arc::new(ToolSetInner { tools }),
        }
    }

    #[must_use]
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.inner.tools.iter().map(|t| t.name()).collect()
    }

    /// List the MCP `Tool`s exposed by this set.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner
            .tools
            .iter()
            .map(|t| {
                let schema_obj = t
                    .input_schema()
                    .as_object()
                    .cloned()
                    .unwrap_or_else(JsonObject::new);
                let mut tool = Tool::new(t.name(), t.description(), Arc::new(schema_obj));
                tool.annotations = Some(annotations_for(&t.method(), t.title()));
                tool
            })
            .collect()
    }

    /// Execute a tool call.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the tool name is unknown
    /// - the arguments do not fit the tool's schema
    /// - the remote system returned a payload the tool needed to parse and could not
    pub async fn call_tool(
        &self,
        tool_name: &str,
        arguments: Value,
        cancel: &CancellationToken,
    ) -> Result<CallToolResult> {
        let tool = self
            .inner
            .tools
            .iter()
            .find(|t| t.name() == tool_name)
            .ok_or_else(|| ApiToolsError::UnknownTool(tool_name.to_string()))?;

        let started = Instant::now();
        let response = tool.invoke(arguments, cancel).await?;
        debug!(
            tool = tool_name,
            is_error = response.is_error(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "tool call finished"
        );
        Ok(response.into())
    }
}
