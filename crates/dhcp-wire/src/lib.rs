//! DHCP message model and wire codec shared by the statistics layer and
//! the test client.
//!
//! This crate provides:
//! - DHCPv6 messages, relay envelopes and options ([`v6`])
//! - Identity associations and the resources they carry ([`ia`])
//! - DHCPv4 messages and Relay Agent Information ([`v4`])
//! - Protocol constants ([`types`])

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod ia;
pub mod types;
pub mod v4;
pub mod v6;
mod wire;

pub use error::{DecodeError, EncodeError};
pub use ia::{IaAddress, IaKind, IaPrefix, IdentityAssociation};
pub use v4::{Dhcp4, RelayAgentInfo};
pub use v6::{Dhcp6, DhcpOption, Message, Options, RelayMessage, StatusCode};
