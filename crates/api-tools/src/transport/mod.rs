//! Outbound transports.
//!
//! A transport takes a fully built [`OutboundRequest`] and produces an [`ExecutionResult`]:
//! an exit code plus captured output and error text, the same triple a shelled-out HTTP
//! client would produce. Tools only ever see this trait, which keeps them testable with a
//! scripted stub.

mod curl;
mod http;

pub use curl::CurlTransport;
pub use http::HttpTransport;

use crate::config::{ToolsConfig, TransportKind};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Exit code reported when the caller cancelled the request (mirrors SIGINT).
pub const CANCELLED_CODE: i32 = 130;

/// A single HTTP request, fully resolved (credentials already rendered into headers).
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body (and the matching `Content-Type`).
    #[must_use]
    pub fn json_body(self, body: Value) -> Self {
        let mut req = self.header("Content-Type", "application/json");
        req.body = Some(body);
        req
    }

    /// Look up a header value (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome of one transport invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self::failure(CANCELLED_CODE, "request cancelled")
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Executes outbound requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`, giving up as soon as `cancel` fires.
    async fn send(&self, request: &OutboundRequest, cancel: &CancellationToken)
    -> ExecutionResult;
}

/// Race a transport future against cancellation.
///
/// The select is biased towards the token: once cancellation is observed the in-flight future
/// is dropped, so a cancelled call never reports the transport's late result.
pub async fn run_cancellable<F>(cancel: &CancellationToken, fut: F) -> ExecutionResult
where
    F: Future<Output = ExecutionResult>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => ExecutionResult::cancelled(),
        result = fut => result,
    }
}

/// Build the transport selected by the config.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_transport(config: &ToolsConfig) -> Result<Arc<dyn Transport>> {
    Ok(match config.transport {
        TransportKind::Http => Arc::new(HttpTransport::new(config.timeout())?),
        TransportKind::Curl => Arc::new(CurlTransport::new(
            config.curl_path.clone().unwrap_or_else(|| "curl".to_string()),
            config.timeout(),
        )),
    })
}
