//! Manual exerciser for a DHCP server running the statistics plugins:
//! plays a relay agent for one DHCPv6 and one DHCPv4 exchange.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// CLI parsing.
pub mod config;
/// UDP send/receive with a reply deadline.
pub mod transport;
/// Relayed DHCPv4 exchange.
pub mod v4;
/// Relayed DHCPv6 exchange.
pub mod v6;
