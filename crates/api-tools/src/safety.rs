//! Redaction helpers for anything that ends up in logs or error text.
//!
//! Lookup URLs carry names in their query string and basic-auth URLs could carry passwords, so
//! both are dropped before a URL is shown to anyone.

use url::Url;

/// Strip credentials, query and fragment from a URL string.
#[must_use]
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => redact_parsed_url(&url),
        Err(_) => "<invalid url>".to_string(),
    }
}

fn redact_parsed_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

/// Render a `reqwest` error with its URL redacted.
#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_parsed_url(u));
    }
    msg
}
