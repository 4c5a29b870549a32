//! `pve_status`: current status of a QEMU VM or LXC container on a Proxmox node.

use crate::adapter::{ApiEndpoint, ApiTool, parse_arguments};
use crate::config::ProxmoxConfig;
use crate::credentials::{Credential, Secret};
use crate::error::Result;
use crate::response::ToolResponse;
use crate::transport::{OutboundRequest, Transport};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const TOOL_NAME: &str = "pve_status";

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuestKind {
    Qemu,
    #[default]
    Lxc,
}

impl GuestKind {
    fn as_path(self) -> &'static str {
        match self {
            Self::Qemu => "qemu",
            Self::Lxc => "lxc",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PveStatusParams {
    pub vmid: u64,
    #[serde(default, rename = "type")]
    pub kind: GuestKind,
    #[serde(default)]
    pub node: Option<String>,
}

#[derive(Debug)]
pub struct PveStatusTool {
    endpoint: ApiEndpoint,
    user: String,
    token_id: String,
    default_node: String,
    secret: Credential,
}

impl PveStatusTool {
    #[must_use]
    pub fn new(config: &ProxmoxConfig, secret: Credential, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: ApiEndpoint::new("Proxmox", config.base_url.clone(), transport),
            user: config.user.clone(),
            token_id: config.token_id.clone(),
            default_node: config.default_node.clone(),
            secret,
        }
    }

    fn build_request(&self, params: &PveStatusParams, secret: &Secret) -> OutboundRequest {
        let node = params.node.as_deref().unwrap_or(&self.default_node);
        let url = self.endpoint.url(&format!(
            "/api2/json/nodes/{node}/{}/{}/status/current",
            params.kind.as_path(),
            params.vmid
        ));
        let auth = format!(
            "PVEAPIToken={}!{}={}",
            self.user,
            self.token_id,
            secret.expose()
        );
        OutboundRequest::get(url).header("Authorization", auth)
    }
}

#[async_trait]
impl ApiTool for PveStatusTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn title(&self) -> &'static str {
        "Proxmox Status"
    }

    fn description(&self) -> &'static str {
        "Check the status of a Virtual Machine or LXC on Proxmox."
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "vmid": {
                    "type": "integer",
                    "description": "The Proxmox VMID"
                },
                "type": {
                    "type": "string",
                    "enum": ["qemu", "lxc"],
                    "default": "lxc"
                },
                "node": {
                    "type": "string",
                    "description": "The Proxmox node name",
                    "default": self.default_node
                }
            },
            "required": ["vmid"]
        })
    }

    async fn invoke(&self, arguments: Value, cancel: &CancellationToken) -> Result<ToolResponse> {
        let params: PveStatusParams = parse_arguments(TOOL_NAME, arguments)?;
        let Some(secret) = &self.secret.value else {
            return Ok(ToolResponse::missing_credential(&self.secret.var));
        };

        let request = self.build_request(&params, secret);
        Ok(match self.endpoint.execute(&request, cancel).await {
            Ok(body) => ToolResponse::passthrough(body),
            Err(response) => response,
        })
    }
}
