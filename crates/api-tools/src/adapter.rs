//! The shared "call an external API and normalize the outcome" pattern.
//!
//! Each tool is a thin configuration over [`ApiEndpoint`]: it checks its credential, builds an
//! [`OutboundRequest`], and lets the endpoint run it and map the [`ExecutionResult`].
//!
//! [`ExecutionResult`]: crate::transport::ExecutionResult

use crate::error::{ApiToolsError, Result};
use crate::response::ToolResponse;
use crate::safety::redact_url;
use crate::transport::{OutboundRequest, Transport};
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A tool exposed to the host runtime.
#[async_trait]
pub trait ApiTool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Human-facing label.
    fn title(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// HTTP method of the call that gives the tool its effect (drives annotations).
    fn method(&self) -> Method;

    /// JSON Schema for the tool arguments.
    fn input_schema(&self) -> Value;

    /// Run the tool.
    ///
    /// Credential and transport problems come back as `Ok(ToolResponse::Error { .. })`. `Err`
    /// is reserved for arguments that do not fit the schema and for remote payloads the tool
    /// had to parse and could not.
    async fn invoke(&self, arguments: Value, cancel: &CancellationToken) -> Result<ToolResponse>;
}

/// Deserialize tool arguments into their typed form, applying serde defaults.
///
/// # Errors
///
/// Returns [`ApiToolsError::InvalidArguments`] if the value does not fit `T`.
pub fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ApiToolsError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// One remote system: display name, base URL and the transport used to reach it.
#[derive(Clone)]
pub struct ApiEndpoint {
    system: &'static str,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("system", &self.system)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiEndpoint {
    #[must_use]
    pub fn new(
        system: &'static str,
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            system,
            base_url: base_url.into(),
            transport,
        }
    }

    /// Join `path` onto the base URL. No encoding is applied.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Run `request` and map a non-zero exit into the standard error response.
    ///
    /// `Ok` holds the captured output of a successful exchange.
    pub async fn execute(
        &self,
        request: &OutboundRequest,
        cancel: &CancellationToken,
    ) -> std::result::Result<String, ToolResponse> {
        info!(
            system = self.system,
            method = %request.method,
            url = %redact_url(&request.url),
            "calling remote API"
        );
        let result = self.transport.send(request, cancel).await;
        if result.is_success() {
            Ok(result.stdout)
        } else {
            warn!(
                system = self.system,
                code = result.code,
                "remote API call failed"
            );
            Err(ToolResponse::api_error(self.system, &result.stderr))
        }
    }
}
