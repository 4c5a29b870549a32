use super::{ExecutionResult, OutboundRequest, Transport, run_cancellable};
use crate::error::{ApiToolsError, Result};
use crate::safety::{redact_url, sanitize_reqwest_error};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Exit code for transport-level failures (connect, TLS, timeout, body read).
const TRANSPORT_FAILURE: i32 = 1;

/// In-process HTTP transport.
///
/// Certificate validation is disabled for every request: the homelab endpoints sit behind
/// self-signed or internal CAs. Like `curl -s`, any HTTP response counts as a completed
/// exchange and its body is returned whatever the status code.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().danger_accept_invalid_certs(true);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().map_err(|e| {
            ApiToolsError::Config(format!(
                "failed to build HTTP client: {}",
                sanitize_reqwest_error(&e)
            ))
        })?;
        Ok(Self { client })
    }

    async fn execute(&self, request: &OutboundRequest) -> ExecutionResult {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => return ExecutionResult::failure(TRANSPORT_FAILURE, sanitize_reqwest_error(&e)),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => return ExecutionResult::failure(TRANSPORT_FAILURE, sanitize_reqwest_error(&e)),
        };

        if status.is_success() {
            debug!(status = status.as_u16(), bytes = text.len(), "http request completed");
        } else {
            warn!(
                url = %redact_url(&request.url),
                status = status.as_u16(),
                "remote API returned non-success status; passing body through"
            );
        }
        ExecutionResult::success(text)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &OutboundRequest,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        run_cancellable(cancel, self.execute(request)).await
    }
}
