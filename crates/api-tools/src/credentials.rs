//! Credential resolution.
//!
//! Secrets are read from the environment exactly once, when [`Credentials`] is built, and then
//! handed to each tool at construction. Tools never touch the process environment themselves.

use crate::config::ToolsConfig;
use std::fmt;

/// A secret string. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// One credential slot: the variable it comes from plus the value, if present.
#[derive(Debug, Clone)]
pub struct Credential {
    pub var: String,
    pub value: Option<Secret>,
}

impl Credential {
    #[must_use]
    pub fn missing(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn present(var: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            value: Some(Secret::new(value)),
        }
    }
}

/// The three secrets the tool set needs, one per remote system.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub nautobot_token: Credential,
    pub proxmox_token: Credential,
    pub aap_password: Credential,
}

impl Credentials {
    /// Resolve all credentials from the process environment.
    #[must_use]
    pub fn from_env(config: &ToolsConfig) -> Self {
        Self::from_lookup(config, |var| std::env::var(var).ok())
    }

    /// Resolve credentials through an arbitrary lookup. Empty values count as absent.
    pub fn from_lookup(config: &ToolsConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let resolve = |var: &str| Credential {
            var: var.to_string(),
            value: lookup(var).filter(|v| !v.is_empty()).map(Secret::new),
        };
        Self {
            nautobot_token: resolve(&config.nautobot.token_env),
            proxmox_token: resolve(&config.proxmox.token_env),
            aap_password: resolve(&config.aap.password_env),
        }
    }

    /// Names of the variables that were not set.
    #[must_use]
    pub fn missing_vars(&self) -> Vec<&str> {
        [&self.nautobot_token, &self.proxmox_token, &self.aap_password]
            .into_iter()
            .filter(|c| c.value.is_none())
            .map(|c| c.var.as_str())
            .collect()
    }
}
