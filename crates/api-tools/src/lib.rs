//! Homelab API tools: thin adapters that forward tool calls to remote HTTP APIs.
//!
//! Three tools are provided:
//! - `nautobot_query` (Nautobot CMDB/IPAM lookup)
//! - `pve_status` (Proxmox VE guest status)
//! - `aap_launch` (Ansible Automation Platform job template launch)
//!
//! Each call resolves an injected credential, builds one or two outbound requests, hands them
//! to a [`transport::Transport`], and passes the remote text through unchanged.

pub mod adapter;
pub mod config;
pub mod credentials;
pub mod error;
pub mod response;
pub mod runtime;
pub mod safety;
pub mod semantics;
pub mod tools;
pub mod transport;

pub use error::{ApiToolsError, Result};
pub use runtime::ToolSet;
