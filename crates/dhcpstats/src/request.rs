use crate::classify;
use crate::config::StatsConfig;
use crate::error::StatsError;
use crate::metrics::{Increment, MetricsSink, PrometheusSink};
use crate::plugin::{Disposition, Plugin};
use crate::relay_info::RelayOrigin;
use crate::unwrap::unwrap;
use crate::view::MessageView;
use dhcp_wire::v4::OpCode;
use dhcp_wire::{Dhcp4, Dhcp6};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Counts inbound requests by type, relay origin and requested IAs.
///
/// Never modifies the response.
pub struct RequestStats {
    sink: Arc<dyn MetricsSink>,
    config: StatsConfig,
}

impl RequestStats {
    /// Name the host configuration refers to.
    pub const NAME: &'static str = "requeststats";

    /// Creates the plugin with an explicit sink.
    #[must_use]
    pub fn new(sink: Arc<dyn MetricsSink>, config: StatsConfig) -> Self {
        Self { sink, config }
    }

    /// Creates the plugin from host-supplied arguments, recording to the
    /// global `metrics` recorder.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the arguments do not parse or validate.
    pub fn setup(args: &[&str]) -> Result<Self, StatsError> {
        let config = StatsConfig::from_args(args)?;
        debug!(target: "dhcpstats::request", ?config, "loaded plugin");
        Ok(Self::new(Arc::new(PrometheusSink), config))
    }

    fn record(&self, increments: &[Increment]) {
        self.sink.record_all(increments);
    }
}

impl Plugin for RequestStats {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle4(&self, req: &Dhcp4, resp: Dhcp4) -> Disposition<Dhcp4> {
        if req.op != OpCode::BootRequest {
            self.record(&classify::ignored4());
            warn!(
                target: "dhcpstats::request",
                op = u8::from(req.op),
                "not a BOOTREQUEST, ignoring"
            );
            return Disposition::Forward(resp);
        }

        let origin = RelayOrigin::of(req);
        match &origin {
            RelayOrigin::WithoutGateway => {
                warn!(target: "dhcpstats::request", mac = %req.client_hw_addr(), "relay agent info without giaddr");
            }
            RelayOrigin::WithoutAgentInfo => {
                warn!(target: "dhcpstats::request", giaddr = %req.giaddr, "relayed request without relay agent info");
            }
            RelayOrigin::Direct | RelayOrigin::Relayed(_) => {}
        }
        self.record(&classify::request4(req.message_type(), &origin));
        Disposition::Forward(resp)
    }

    fn handle6(&self, req: &Dhcp6, resp: Dhcp6) -> Disposition<Dhcp6> {
        let inner = match unwrap(req.clone(), self.config.max_relay_depth) {
            Ok(inner) => inner,
            Err(e) => {
                self.record(&classify::undecodable_request6(req.is_relay()));
                error!(
                    target: "dhcpstats::request",
                    reason = e.reason(),
                    "could not decapsulate request: {e}"
                );
                return Disposition::Drop;
            }
        };

        let view = MessageView::new(&inner.message, inner.depth);
        self.record(&classify::request6(&view));
        Disposition::Forward(resp)
    }
}
