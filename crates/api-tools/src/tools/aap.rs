//! `aap_launch`: find a Job Template by name in Ansible Automation Platform and launch it.
//!
//! Two strictly sequential requests: a filtered list lookup, then a POST to the template's
//! launch endpoint. The launch is fire-and-forget; the resulting job is not polled.

use crate::adapter::{ApiEndpoint, ApiTool, parse_arguments};
use crate::config::AapConfig;
use crate::credentials::{Credential, Secret};
use crate::error::{ApiToolsError, Result};
use crate::response::ToolResponse;
use crate::transport::{OutboundRequest, Transport};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const TOOL_NAME: &str = "aap_launch";

const SYSTEM: &str = "AAP";

#[derive(Debug, Clone, Deserialize)]
pub struct AapLaunchParams {
    pub template_name: String,
    #[serde(default)]
    pub limit: Option<String>,
    /// Forwarded to the launch body untouched.
    #[serde(default)]
    pub extra_vars: Option<Value>,
}

/// The part of `GET /api/v2/job_templates/` this tool relies on.
#[derive(Debug, Deserialize)]
struct TemplateList {
    count: u64,
    #[serde(default)]
    results: Vec<TemplateSummary>,
}

#[derive(Debug, Deserialize)]
struct TemplateSummary {
    id: u64,
}

#[derive(Debug)]
pub struct AapLaunchTool {
    endpoint: ApiEndpoint,
    username: String,
    password: Credential,
}

impl AapLaunchTool {
    #[must_use]
    pub fn new(config: &AapConfig, password: Credential, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: ApiEndpoint::new(SYSTEM, config.base_url.clone(), transport),
            username: config.username.clone(),
            password,
        }
    }

    fn basic_auth(&self, password: &Secret) -> String {
        let raw = format!("{}:{}", self.username, password.expose());
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }

    fn lookup_request(&self, template_name: &str, password: &Secret) -> OutboundRequest {
        let encoded: String = url::form_urlencoded::byte_serialize(template_name.as_bytes()).collect();
        OutboundRequest::get(
            self.endpoint
                .url(&format!("/api/v2/job_templates/?name={encoded}")),
        )
        .header("Authorization", self.basic_auth(password))
    }

    fn launch_request(
        &self,
        template_id: u64,
        params: &AapLaunchParams,
        password: &Secret,
    ) -> OutboundRequest {
        OutboundRequest::post(
            self.endpoint
                .url(&format!("/api/v2/job_templates/{template_id}/launch/")),
        )
        .header("Authorization", self.basic_auth(password))
        .json_body(launch_payload(params))
    }
}

/// Launch body: `limit` and `extra_vars` only when the caller supplied them.
fn launch_payload(params: &AapLaunchParams) -> Value {
    let mut payload = Map::new();
    if let Some(limit) = &params.limit {
        payload.insert("limit".to_string(), Value::String(limit.clone()));
    }
    if let Some(extra_vars) = &params.extra_vars {
        payload.insert("extra_vars".to_string(), extra_vars.clone());
    }
    Value::Object(payload)
}

/// First template id in a lookup body, `None` when nothing matched.
fn first_template_id(body: &str) -> Result<Option<u64>> {
    let list: TemplateList =
        serde_json::from_str(body).map_err(|e| ApiToolsError::MalformedPayload {
            system: SYSTEM,
            message: format!("job template lookup: {e}"),
        })?;
    if list.count == 0 {
        return Ok(None);
    }
    list.results
        .first()
        .map(|t| Some(t.id))
        .ok_or_else(|| ApiToolsError::MalformedPayload {
            system: SYSTEM,
            message: format!(
                "job template lookup reported count {} but returned no results",
                list.count
            ),
        })
}

#[async_trait]
impl ApiTool for AapLaunchTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn title(&self) -> &'static str {
        "AAP Launch"
    }

    fn description(&self) -> &'static str {
        "Launch a Job Template in Ansible Automation Platform."
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "template_name": {
                    "type": "string",
                    "description": "The name of the Job Template"
                },
                "limit": {
                    "type": "string",
                    "description": "Inventory limit (e.g., hostname)"
                },
                "extra_vars": {
                    "description": "Extra variables for the job"
                }
            },
            "required": ["template_name"]
        })
    }

    async fn invoke(&self, arguments: Value, cancel: &CancellationToken) -> Result<ToolResponse> {
        let params: AapLaunchParams = parse_arguments(TOOL_NAME, arguments)?;
        let Some(password) = &self.password.value else {
            return Ok(ToolResponse::missing_credential(&self.password.var));
        };

        let lookup = self.lookup_request(&params.template_name, password);
        let body = match self.endpoint.execute(&lookup, cancel).await {
            Ok(body) => body,
            Err(response) => return Ok(response),
        };

        let Some(template_id) = first_template_id(&body)? else {
            info!(template = %params.template_name, "job template not found");
            return Ok(ToolResponse::error(format!(
                "Error: Job Template '{}' not found.",
                params.template_name
            )));
        };

        info!(template = %params.template_name, template_id, "launching job template");
        let launch = self.launch_request(template_id, &params, password);
        Ok(match self.endpoint.execute(&launch, cancel).await {
            Ok(body) => ToolResponse::passthrough(body),
            Err(response) => response,
        })
    }
}
