use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Every counter the plugins export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// DHCPv4 requests by message type.
    V4Requests,
    /// DHCPv4 requests received from a relay.
    V4FromRelays,
    /// Relay metadata missing from DHCPv4 requests.
    V4RaiMissingSuboptions,
    /// DHCPv6 requests by innermost message type.
    V6Requests,
    /// DHCPv6 requests received through a relay.
    V6FromRelays,
    /// DHCPv6 IAs requested, by kind.
    V6RequestedIas,
    /// DHCPv4 responses by message type.
    V4Responses,
    /// DHCPv4 leases processed, by outcome.
    V4LeasesProcessed,
    /// DHCPv4 responses sent to a relay.
    V4ToRelays,
    /// DHCPv6 responses by message type.
    V6Responses,
    /// DHCPv6 responses sent to a relay.
    V6ToRelays,
    /// DHCPv6 IA outcomes, by kind and quantifier.
    V6IasProcessed,
}

impl Counter {
    /// All counters, in export order.
    pub const ALL: [Self; 12] = [
        Self::V4Requests,
        Self::V4FromRelays,
        Self::V4RaiMissingSuboptions,
        Self::V6Requests,
        Self::V6FromRelays,
        Self::V6RequestedIas,
        Self::V4Responses,
        Self::V4LeasesProcessed,
        Self::V4ToRelays,
        Self::V6Responses,
        Self::V6ToRelays,
        Self::V6IasProcessed,
    ];

    /// Exported metric name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::V4Requests => "dhcpv4_requests_total",
            Self::V4FromRelays => "dhcpv4_from_relays_total",
            Self::V4RaiMissingSuboptions => "dhcpv4_rai_missing_suboptions_total",
            Self::V6Requests => "dhcpv6_requests_total",
            Self::V6FromRelays => "dhcpv6_from_relays_total",
            Self::V6RequestedIas => "dhcpv6_requested_ias_total",
            Self::V4Responses => "dhcpv4_responses_total",
            Self::V4LeasesProcessed => "dhcpv4_leases_processed_total",
            Self::V4ToRelays => "dhcpv4_to_relays_total",
            Self::V6Responses => "dhcpv6_responses_total",
            Self::V6ToRelays => "dhcpv6_to_relays_total",
            Self::V6IasProcessed => "dhcpv6_ias_processed_total",
        }
    }

    /// Help text shown by the exporter.
    #[must_use]
    pub const fn help(self) -> &'static str {
        match self {
            Self::V4Requests => "DHCPv4 requests by message type",
            Self::V4FromRelays => "DHCPv4 requests received from a relay",
            Self::V4RaiMissingSuboptions => {
                "DHCPv4 relayed requests missing relay agent information"
            }
            Self::V6Requests => "DHCPv6 requests by message type",
            Self::V6FromRelays => "DHCPv6 requests received from a relay",
            Self::V6RequestedIas => "DHCPv6 IAs requested by type",
            Self::V4Responses => "DHCPv4 responses by message type",
            Self::V4LeasesProcessed => "DHCPv4 leases processed by result",
            Self::V4ToRelays => "DHCPv4 responses sent to a relay",
            Self::V6Responses => "DHCPv6 responses by message type",
            Self::V6ToRelays => "DHCPv6 responses sent to a relay",
            Self::V6IasProcessed => "DHCPv6 IAs processed by type and result",
        }
    }

    /// Label keys, in the order an [`Increment`] supplies their values.
    #[must_use]
    pub const fn label_keys(self) -> &'static [&'static str] {
        match self {
            Self::V4Requests
            | Self::V6Requests
            | Self::V6RequestedIas
            | Self::V4Responses
            | Self::V6Responses => &["type"],
            Self::V4RaiMissingSuboptions => &["suboption"],
            Self::V4LeasesProcessed => &["result"],
            Self::V6IasProcessed => &["type", "result"],
            Self::V4FromRelays | Self::V6FromRelays | Self::V4ToRelays | Self::V6ToRelays => &[],
        }
    }
}

/// One counter bump: which counter, its label values and the amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Increment {
    /// Counter to bump.
    pub counter: Counter,
    /// Label values, positionally matching [`Counter::label_keys`].
    pub labels: Vec<String>,
    /// Amount to add.
    pub amount: u64,
}

impl Increment {
    /// A bump of one with no label values yet.
    #[must_use]
    pub const fn new(counter: Counter) -> Self {
        Self {
            counter,
            labels: Vec::new(),
            amount: 1,
        }
    }

    /// Appends the next label value.
    #[must_use]
    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.labels.push(value.into());
        self
    }

    /// Sets the amount.
    #[must_use]
    pub const fn by(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }
}

/// Destination for counter increments.
pub trait MetricsSink: Send + Sync {
    /// Applies one increment.
    fn record(&self, increment: &Increment);

    /// Applies increments in order.
    fn record_all(&self, increments: &[Increment]) {
        for increment in increments {
            self.record(increment);
        }
    }
}

/// Sink forwarding to the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusSink;

impl MetricsSink for PrometheusSink {
    fn record(&self, increment: &Increment) {
        let labels: Vec<(&'static str, String)> = increment
            .counter
            .label_keys()
            .iter()
            .copied()
            .zip(increment.labels.iter().cloned())
            .collect();
        metrics::counter!(increment.counter.name(), &labels).increment(increment.amount);
    }
}

/// Registers help texts for every counter with the installed recorder.
pub fn describe() {
    for counter in Counter::ALL {
        metrics::describe_counter!(counter.name(), counter.help());
    }
}

/// Routes `/metrics` for an already installed recorder.
pub fn router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let h = handle.clone();
            async move { h.render() }
        }),
    )
}

/// Installs the Prometheus recorder and serves [`router`] on `addr`.
///
/// # Errors
///
/// Returns an error if a recorder is already installed or binding the
/// metrics HTTP server fails.
pub async fn start_metrics_server(addr: SocketAddr) -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe();

    let app = router(handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("metrics server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn counter_names_are_unique() {
        let names: HashSet<_> = Counter::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), Counter::ALL.len());
        assert!(names.iter().all(|n| n.ends_with("_total")));
    }

    #[test]
    fn ias_processed_has_two_labels() {
        assert_eq!(Counter::V6IasProcessed.label_keys(), &["type", "result"]);
        assert!(Counter::V6ToRelays.label_keys().is_empty());
    }

    #[test]
    fn increment_builder() {
        let inc = Increment::new(Counter::V6RequestedIas).label("IA_PD").by(3);
        assert_eq!(inc.labels, vec!["IA_PD".to_string()]);
        assert_eq!(inc.amount, 3);
    }

    #[test]
    fn prometheus_sink_renders_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            PrometheusSink.record_all(&[
                Increment::new(Counter::V6IasProcessed)
                    .label("IA_NA")
                    .label("some"),
                Increment::new(Counter::V6ToRelays),
            ]);
        });
        let body = handle.render();
        let line = body
            .lines()
            .find(|l| l.starts_with("dhcpv6_ias_processed_total{"))
            .unwrap();
        assert!(line.contains(r#"type="IA_NA""#));
        assert!(line.contains(r#"result="some""#));
        assert!(line.ends_with(" 1"));
        assert!(body.contains("dhcpv6_to_relays_total 1"));
    }
}
