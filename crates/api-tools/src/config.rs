use crate::error::{ApiToolsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Top-level configuration for the tool set.
///
/// Every field has a default, so an empty document (or no file at all) yields a working
/// configuration pointed at the homelab endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    /// Which transport executes outbound requests.
    pub transport: TransportKind,
    /// Per-request timeout in seconds. `0` disables the timeout.
    pub timeout_secs: Option<u64>,
    /// Path of the `curl` binary used by the `curl` transport.
    pub curl_path: Option<String>,
    pub nautobot: NautobotConfig,
    pub proxmox: ProxmoxConfig,
    pub aap: AapConfig,
}

/// Outbound transport selection.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// In-process HTTP client.
    #[default]
    Http,
    /// Shell out to `curl`.
    Curl,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NautobotConfig {
    pub base_url: String,
    /// Environment variable holding the API token.
    pub token_env: String,
}

impl Default for NautobotConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ipmgmt.sigtom.dev".to_string(),
            token_env: "NAUTOBOT_API_TOKEN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxmoxConfig {
    pub base_url: String,
    /// API token owner, e.g. `sre-bot@pve`.
    pub user: String,
    pub token_id: String,
    /// Environment variable holding the token secret.
    pub token_env: String,
    /// Node used when a call does not name one.
    pub default_node: String,
}

impl Default for ProxmoxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://172.16.110.101:8006".to_string(),
            user: "sre-bot@pve".to_string(),
            token_id: "sre-token".to_string(),
            token_env: "PROXMOX_SRE_BOT_API_TOKEN".to_string(),
            default_node: "wow-prox1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AapConfig {
    pub base_url: String,
    pub username: String,
    /// Environment variable holding the controller password.
    pub password_env: String,
}

impl Default for AapConfig {
    fn default() -> Self {
        Self {
            base_url: "https://aap.apps.ossus.sigtomtech.com".to_string(),
            username: "admin".to_string(),
            password_env: "CONTROLLER_PASSWORD".to_string(),
        }
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl ToolsConfig {
    /// Effective request timeout (`None` when disabled).
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Check the base URLs once, up front, so a typo fails at startup rather than per call.
    ///
    /// # Errors
    ///
    /// Returns an error if any base URL does not parse as an absolute `http(s)` URL.
    pub fn validate(&self) -> Result<()> {
        for (system, base_url) in [
            ("nautobot", &self.nautobot.base_url),
            ("proxmox", &self.proxmox.base_url),
            ("aap", &self.aap.base_url),
        ] {
            let url = Url::parse(base_url).map_err(|e| {
                ApiToolsError::Config(format!("Invalid baseUrl '{base_url}' for {system}: {e}"))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ApiToolsError::Config(format!(
                    "Invalid baseUrl '{base_url}' for {system}: unsupported scheme '{}'",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate a YAML config file. `None` yields the built-in defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML for [`ToolsConfig`], or
/// fails [`ToolsConfig::validate`].
pub fn load_config(path: Option<&Path>) -> Result<ToolsConfig> {
    let cfg = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            if raw.trim().is_empty() {
                ToolsConfig::default()
            } else {
                serde_yaml::from_str(&raw)?
            }
        }
        None => ToolsConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}
