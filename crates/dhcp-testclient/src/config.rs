use clap::{Parser, ValueEnum};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Identifier the simulated relay attaches to every request.
pub const DEFAULT_CIRCUIT_ID: &str = "router1.us-ca-sfba.prod.example.com:Eth12/1(Port12)";

/// Which exchanges to run.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Family {
    /// DHCPv6 then DHCPv4.
    #[default]
    Both,
    /// DHCPv4 only.
    V4,
    /// DHCPv6 only.
    V6,
}

impl Family {
    /// `true` if the DHCPv4 exchange should run.
    #[must_use]
    pub const fn runs_v4(self) -> bool {
        matches!(self, Self::Both | Self::V4)
    }

    /// `true` if the DHCPv6 exchange should run.
    #[must_use]
    pub const fn runs_v6(self) -> bool {
        matches!(self, Self::Both | Self::V6)
    }
}

/// CLI interface for the exchange exerciser.
#[derive(Parser, Debug)]
#[command(
    name = "dhcp-testclient",
    about = "Runs a relayed DHCPv6 and DHCPv4 exchange against a local server"
)]
#[command(version)]
pub struct Cli {
    /// Client hardware address.
    #[arg(default_value = "00:11:22:33:44:55", value_parser = parse_mac)]
    pub mac: [u8; 6],

    /// Exchanges to run.
    #[arg(long, value_enum, default_value_t = Family::Both)]
    pub family: Family,

    /// Local DHCPv6 address to bind.
    #[arg(long, env = "DHCP_TESTCLIENT_LOCAL6", default_value = "[::1]:546")]
    pub local6: SocketAddr,

    /// DHCPv6 server address.
    #[arg(long, env = "DHCP_TESTCLIENT_SERVER6", default_value = "[::1]:547")]
    pub server6: SocketAddr,

    /// Local DHCPv4 address to bind.
    #[arg(long, env = "DHCP_TESTCLIENT_LOCAL4", default_value = "0.0.0.0:67")]
    pub local4: SocketAddr,

    /// DHCPv4 server address.
    #[arg(long, env = "DHCP_TESTCLIENT_SERVER4", default_value = "127.0.0.1:67")]
    pub server4: SocketAddr,

    /// Relay gateway address placed in DHCPv4 requests.
    #[arg(long, env = "DHCP_TESTCLIENT_GIADDR", default_value = "10.99.99.1")]
    pub giaddr: Ipv4Addr,

    /// Interface-ID (v6) and circuit-id (v4) the simulated relay sends.
    #[arg(long, default_value = DEFAULT_CIRCUIT_ID)]
    pub circuit_id: String,

    /// Seconds to wait for each reply.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Increase log verbosity (repeat for more detail).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Per-reply receive timeout.
    #[must_use]
    pub const fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Parses a colon- or dash-separated 48-bit MAC address.
///
/// # Errors
///
/// Returns a description of the problem if `s` is not six hex octets.
pub fn parse_mac(s: &str) -> Result<[u8; 6], String> {
    let parts: Vec<&str> = s.split([':', '-']).collect();
    if parts.len() != 6 {
        return Err(format!("expected 6 octets, got {}", parts.len()));
    }
    let mut mac = [0u8; 6];
    for (byte, part) in mac.iter_mut().zip(&parts) {
        if part.len() != 2 {
            return Err(format!("invalid octet {part:?}"));
        }
        *byte = u8::from_str_radix(part, 16).map_err(|e| format!("invalid octet {part:?}: {e}"))?;
    }
    Ok(mac)
}
