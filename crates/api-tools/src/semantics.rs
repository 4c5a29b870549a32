//! MCP tool annotations derived from the HTTP method a tool ends up calling.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Annotations for a tool whose externally visible effect is an HTTP `method` call.
///
/// Every tool here talks to a remote system, so `openWorldHint` is always set. Lookups are
/// read-only; a launch creates a new remote job on every call, so it is neither read-only nor
/// idempotent.
#[must_use]
pub fn annotations_for(method: &Method, title: &str) -> ToolAnnotations {
    let read_only = *method == Method::GET || *method == Method::HEAD;
    let idempotent = read_only || *method == Method::PUT || *method == Method::DELETE;
    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: Some(read_only),
        destructive_hint: Some(false),
        idempotent_hint: Some(idempotent),
        open_world_hint: Some(true),
    }
}
