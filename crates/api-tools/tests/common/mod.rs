#![allow(dead_code)]

use async_trait::async_trait;
use homelab_api_tools::ToolSet;
use homelab_api_tools::config::ToolsConfig;
use homelab_api_tools::credentials::Credentials;
use homelab_api_tools::transport::{ExecutionResult, OutboundRequest, Transport, run_cancellable};
use parking_lot::Mutex;
use rmcp::model::CallToolResult;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What the stub does for one request.
pub enum Step {
    Respond(ExecutionResult),
    /// Respond after a delay (cancellable while waiting).
    Delayed(Duration, ExecutionResult),
    /// Never respond; only cancellation ends the wait.
    Hang,
}

/// Scripted transport that records every request it sees.
#[derive(Default)]
pub struct StubTransport {
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl StubTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: &str) -> Step {
        Step::Respond(ExecutionResult::success(body))
    }

    pub fn fail(code: i32, stderr: &str) -> Step {
        Step::Respond(ExecutionResult::failure(code, stderr))
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: &OutboundRequest, cancel: &CancellationToken) -> ExecutionResult {
        self.requests.lock().push(request.clone());
        let step = self.script.lock().pop_front();
        match step {
            Some(Step::Respond(result)) => run_cancellable(cancel, async { result }).await,
            Some(Step::Delayed(delay, result)) => {
                run_cancellable(cancel, async move {
                    tokio::time::sleep(delay).await;
                    result
                })
                .await
            }
            Some(Step::Hang) => run_cancellable(cancel, std::future::pending()).await,
            None => ExecutionResult::failure(99, "stub transport: unscripted request"),
        }
    }
}

/// Every credential present.
pub fn all_credentials(config: &ToolsConfig) -> Credentials {
    Credentials::from_lookup(config, |var| Some(format!("{var}-value")))
}

pub fn tool_set_with(stub: &Arc<StubTransport>, credentials: Credentials) -> ToolSet {
    let cfg = ToolsConfig::default();
    ToolSet::new(&cfg, credentials, stub.clone())
}

pub fn tool_set(stub: &Arc<StubTransport>) -> ToolSet {
    tool_set_with(stub, all_credentials(&ToolsConfig::default()))
}

/// `(text, is_error, structuredContent)` of a call result.
pub fn unpack(result: &CallToolResult) -> (String, bool, Option<Value>) {
    let v = serde_json::to_value(result).expect("CallToolResult serializes");
    let text = v
        .get("content")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
        .expect("content[0].text")
        .to_string();
    let is_error = v.get("isError").and_then(Value::as_bool).unwrap_or(false);
    let structured = v.get("structuredContent").filter(|s| !s.is_null()).cloned();
    (text, is_error, structured)
}
