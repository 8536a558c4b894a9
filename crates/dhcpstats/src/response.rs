use crate::classify::{self, IaOutcome, Side};
use crate::config::{LogMode, StatsConfig};
use crate::error::StatsError;
use crate::metrics::{Increment, MetricsSink, PrometheusSink};
use crate::plugin::{Disposition, LineLogger, Plugin};
use crate::reconcile::reconcile;
use crate::relay_info::extract;
use crate::unwrap::unwrap;
use crate::view::MessageView;
use dhcp_wire::v4::OpCode;
use dhcp_wire::{Dhcp4, Dhcp6, DhcpOption, IaKind};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Logger writing through `tracing` at the level `mode` selects.
#[must_use]
pub fn tracing_logger(mode: LogMode) -> LineLogger {
    match mode {
        LogMode::Verbose => Arc::new(|line: &str| info!(target: "dhcpstats::response", "{line}")),
        LogMode::Silent => Arc::new(|line: &str| debug!(target: "dhcpstats::response", "{line}")),
    }
}

/// Counts outbound responses, fills in denials for IAs the server left
/// out, and logs one line per response.
pub struct ResponseStats {
    sink: Arc<dyn MetricsSink>,
    config: StatsConfig,
    logger: LineLogger,
}

impl ResponseStats {
    /// Name the host configuration refers to.
    pub const NAME: &'static str = "responsestats";

    /// Creates the plugin with an explicit sink, logging through `tracing`.
    #[must_use]
    pub fn new(sink: Arc<dyn MetricsSink>, config: StatsConfig) -> Self {
        let logger = tracing_logger(config.log_mode);
        Self {
            sink,
            config,
            logger,
        }
    }

    /// Replaces the line logger.
    #[must_use]
    pub fn with_logger(mut self, logger: LineLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Creates the plugin from host-supplied arguments, recording to the
    /// global `metrics` recorder.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the arguments do not parse or validate.
    pub fn setup(args: &[&str]) -> Result<Self, StatsError> {
        let config = StatsConfig::from_args(args)?;
        debug!(target: "dhcpstats::response", ?config, "loaded plugin");
        Ok(Self::new(Arc::new(PrometheusSink), config))
    }

    fn record(&self, increments: &[Increment]) {
        self.sink.record_all(increments);
    }

    /// Reconciles a DHCPv6 response against its request. Returns the
    /// patched response and the number of denials added.
    fn reconcile6(&self, req: &Dhcp6, resp: Dhcp6) -> Result<(Dhcp6, usize), StatsError> {
        let mut reply = match resp {
            Dhcp6::Client(msg) => msg,
            Dhcp6::Relay(relay) => {
                return Err(StatsError::ShapeMismatch {
                    expected: "client response",
                    got: relay.msg_type.to_string(),
                })
            }
        };
        let request = unwrap(req.clone(), self.config.max_relay_depth)?;
        let view = MessageView::new(&request.message, request.depth);

        let mut outcomes = Vec::new();
        let mut denials = Vec::new();
        for kind in IaKind::ALL {
            let requested = view.reservations(kind);
            if requested.is_empty() {
                continue;
            }
            let granted: Vec<_> = reply.options.ias(kind).collect();
            let rec = reconcile(&requested, &granted);
            outcomes.push(IaOutcome {
                kind,
                quantifier: rec.quantifier,
            });
            denials.extend(rec.denials);
        }

        let added = denials.len();
        for denial in denials {
            reply.add_option(DhcpOption::Ia(denial));
        }

        self.record(&classify::response6(
            reply.msg_type,
            view.is_relayed(),
            &outcomes,
        ));
        Ok((Dhcp6::Client(reply), added))
    }
}

impl Plugin for ResponseStats {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handle4(&self, req: &Dhcp4, resp: Dhcp4) -> Disposition<Dhcp4> {
        if req.op != OpCode::BootRequest {
            return Disposition::Forward(resp);
        }

        let rai = req.relay_agent_info();
        self.record(&classify::response4(
            resp.message_type(),
            resp.has_your_ip(),
            rai.is_some(),
        ));

        let mac = req.client_hw_addr();
        let line = match rai {
            None if resp.has_gateway() => format!(
                "[giaddr={} has no RAI] MAC {mac} allocated {}",
                resp.giaddr, resp.yiaddr
            ),
            None => format!("MAC {mac} allocated {}", resp.yiaddr),
            Some(rai) => {
                let meta = extract(&rai);
                let link = meta
                    .link_selector
                    .map(|ip| ip.to_string())
                    .unwrap_or_default();
                format!(
                    "[relay={} link={link} intf={}] MAC {mac} allocated {}",
                    req.giaddr, meta.interface_label, resp.yiaddr
                )
            }
        };
        (self.logger)(&line);
        Disposition::Forward(resp)
    }

    fn handle6(&self, req: &Dhcp6, resp: Dhcp6) -> Disposition<Dhcp6> {
        match self.reconcile6(req, resp) {
            Ok((resp, 0)) => {
                (self.logger)(&resp.to_string());
                Disposition::Forward(resp)
            }
            Ok((resp, added)) => {
                (self.logger)(&format!("[added {added} statuscodes] {resp}"));
                Disposition::Forward(resp)
            }
            Err(e) => {
                self.record(&classify::error6(Side::Response));
                error!(target: "dhcpstats::response", "dropping response: {e}");
                Disposition::Drop
            }
        }
    }
}
