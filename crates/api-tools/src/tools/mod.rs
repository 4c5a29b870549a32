//! The three homelab tools.

pub mod aap;
pub mod nautobot;
pub mod proxmox;

pub use aap::{AapLaunchParams, AapLaunchTool};
pub use nautobot::{NautobotObjectType, NautobotQueryParams, NautobotQueryTool};
pub use proxmox::{GuestKind, PveStatusParams, PveStatusTool};

#[cfg(test)]
pub(crate) struct NoTransport;

#[cfg(test)]
#[async_trait::async_trait]
impl crate::transport::Transport for NoTransport {
    async fn send(
        &self,
        _: &crate::transport::OutboundRequest,
        _: &tokio_util::sync::CancellationToken,
    ) -> crate::transport::ExecutionResult {
        crate::transport::ExecutionResult::failure(1, "no transport in unit tests")
    }
}
