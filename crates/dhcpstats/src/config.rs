use crate::error::StatsError;
use clap::{Parser, ValueEnum};
use dhcp_wire::types::HOP_COUNT_LIMIT;
use std::ffi::OsString;

/// Default number of relay envelopes opened before a request is dropped.
pub const DEFAULT_MAX_RELAY_DEPTH: usize = HOP_COUNT_LIMIT as usize;

/// Upper bound accepted for `--max-relay-depth`.
pub const MAX_ALLOWED_RELAY_DEPTH: usize = 32;

/// Visibility of the per-response summary line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogMode {
    /// Log at `info`.
    #[default]
    Verbose,
    /// Log at `debug`.
    Silent,
}

/// Arguments handed to a plugin by the host server's configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "dhcpstats", no_binary_name = true)]
#[command(about = "DHCP request/response statistics plugin")]
pub struct PluginArgs {
    /// Visibility of per-response log lines.
    #[arg(value_enum, default_value_t = LogMode::Verbose)]
    pub mode: LogMode,
    /// Maximum relay envelopes opened per request.
    #[arg(long, default_value_t = DEFAULT_MAX_RELAY_DEPTH, env = "DHCPSTATS_MAX_RELAY_DEPTH")]
    pub max_relay_depth: usize,
}

/// Runtime configuration derived from [`PluginArgs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    /// Visibility of per-response log lines.
    pub log_mode: LogMode,
    /// Maximum relay envelopes opened per request.
    pub max_relay_depth: usize,
}

impl StatsConfig {
    /// Parses and validates a host-supplied argument list.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Args`] for unparseable arguments and
    /// [`StatsError::Config`] for out-of-range values.
    pub fn from_args<I, T>(args: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config: Self = PluginArgs::try_parse_from(args)?.into();
        config.validate().map_err(StatsError::Config)?;
        Ok(config)
    }

    /// Validates the configuration values are within acceptable bounds.
    /// Returns Ok(()) if valid, Err with description otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_relay_depth == 0 {
            return Err("max_relay_depth must be greater than 0".to_string());
        }
        if self.max_relay_depth > MAX_ALLOWED_RELAY_DEPTH {
            return Err(format!(
                "max_relay_depth exceeds maximum allowed ({MAX_ALLOWED_RELAY_DEPTH})"
            ));
        }
        Ok(())
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            log_mode: LogMode::Verbose,
            max_relay_depth: DEFAULT_MAX_RELAY_DEPTH,
        }
    }
}

impl From<PluginArgs> for StatsConfig {
    fn from(args: PluginArgs) -> Self {
        Self {
            log_mode: args.mode,
            max_relay_depth: args.max_relay_depth,
        }
    }
}
