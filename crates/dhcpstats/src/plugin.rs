use dhcp_wire::{Dhcp4, Dhcp6};
use std::sync::Arc;

/// What the host should do with a response after a plugin has seen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition<M> {
    /// Pass the (possibly modified) response to the next handler.
    Forward(M),
    /// Stop processing and send nothing.
    Drop,
}

impl<M> Disposition<M> {
    /// `true` if the exchange must be dropped.
    #[must_use]
    pub const fn is_drop(&self) -> bool {
        matches!(self, Self::Drop)
    }

    /// The forwarded response, if any.
    #[must_use]
    pub fn into_response(self) -> Option<M> {
        match self {
            Self::Forward(m) => Some(m),
            Self::Drop => None,
        }
    }
}

/// A handler the host server chains into its request pipeline.
///
/// Implementations take `&self` and may be called concurrently.
pub trait Plugin: Send + Sync {
    /// Name the host configuration refers to.
    fn name(&self) -> &'static str;

    /// Handles a DHCPv4 exchange.
    fn handle4(&self, req: &Dhcp4, resp: Dhcp4) -> Disposition<Dhcp4>;

    /// Handles a DHCPv6 exchange.
    fn handle6(&self, req: &Dhcp6, resp: Dhcp6) -> Disposition<Dhcp6>;
}

/// Sink for human-readable per-exchange log lines.
pub type LineLogger = Arc<dyn Fn(&str) + Send + Sync>;
