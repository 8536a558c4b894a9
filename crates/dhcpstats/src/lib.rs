//! Request and response statistics for a DHCP server pipeline.
//!
//! Two plugins sit in the host server's handler chain:
//! - [`RequestStats`] counts inbound requests by type, relay origin and
//!   requested identity associations.
//! - [`ResponseStats`] counts outbound responses, adds explicit denials
//!   for IAs the server silently left out, and logs one line per response.
//!
//! Counters go to an injected [`MetricsSink`]; [`metrics::start_metrics_server`]
//! exposes them to Prometheus.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Mapping of exchange facts onto counter increments.
pub mod classify;
/// Plugin argument parsing and configuration.
pub mod config;
/// Error types for exchange processing and setup.
pub mod error;
/// Counters, the metrics sink and the Prometheus HTTP endpoint.
pub mod metrics;
/// The plugin interface the host server calls.
pub mod plugin;
/// Matching of requested IAs against the ones a response grants.
pub mod reconcile;
/// Relay metadata carried by DHCPv4 requests.
pub mod relay_info;
/// Request statistics plugin.
pub mod request;
/// Response statistics plugin.
pub mod response;
/// Relay envelope removal.
pub mod unwrap;
/// Read-only views over client messages.
pub mod view;

pub use config::{LogMode, PluginArgs, StatsConfig};
pub use error::StatsError;
pub use metrics::{Counter, Increment, MetricsSink, PrometheusSink};
pub use plugin::{Disposition, LineLogger, Plugin};
pub use request::RequestStats;
pub use response::ResponseStats;
