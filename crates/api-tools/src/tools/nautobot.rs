//! `nautobot_query`: look up a device or virtual machine by name in Nautobot.

use crate::adapter::{ApiEndpoint, ApiTool, parse_arguments};
use crate::config::NautobotConfig;
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

pub const TOOL_NAME: &str = "nautobot_query";

/// Which Nautobot collection to search.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NautobotObjectType {
    Device,
    #[default]
    Vm,
}

impl NautobotObjectType {
    fn collection(self) -> &'static str {
        match self {
            Self::Device => "dcim/devices",
            Self::Vm => "virtualization/virtual-machines",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NautobotQueryParams {
    pub name: String,
    #[serde(default, rename = "type")]
    pub object_type: NautobotObjectType,
}

#[derive(Debug)]
pub struct NautobotQueryTool {
    endpoint: ApiEndpoint,
    token: Credential,
}

impl NautobotQueryTool {
    #[must_use]
    pub fn new(config: &NautobotConfig, token: Credential, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: ApiEndpoint::new("Nautobot", config.base_url.clone(), transport),
            token,
        }
    }

    /// The name goes into the query string as given; values containing `&`, `#` or similar
    /// will change the query the server sees.
    fn build_request(&self, params: &NautobotQueryParams, token: &Secret) -> OutboundRequest {
        let url = self.endpoint.url(&format!(
            "/api/{}/?name={}",
            params.object_type.collection(),
            params.name
        ));
        OutboundRequest::get(url).header("Authorization", format!("Token {}", token.expose()))
    }
}

#[async_trait]
impl ApiTool for NautobotQueryTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn title(&self) -> &'static str {
        "Nautobot Query"
    }

    fn description(&self) -> &'static str {
        "Query Nautobot for device or virtual machine information by name."
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "The name of the device or VM to search for"
                },
                "type": {
                    "type": "string",
                    "enum": ["device", "vm"],
                    "default": "vm"
                }
            },
            "required": ["name"]
        })
    }

    async fn invoke(&self, arguments: Value, cancel: &CancellationToken) -> Result<ToolResponse> {
        let params: NautobotQueryParams = parse_arguments(TOOL_NAME, arguments)?;
        let Some(token) = &self.token.value else {
            return Ok(ToolResponse::missing_credential(&self.token.var));
        };

        let request = self.build_request(&params, token);
        Ok(match self.endpoint.execute(&request, cancel).await {
            Ok(body) => ToolResponse::passthrough(body),
            Err(response) => response,
        })
    }
}
