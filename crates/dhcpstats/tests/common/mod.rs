#![allow(dead_code)]

use dhcp_wire::types::v4::rai_suboption;
use dhcp_wire::v4::MessageType as MessageType4;
use dhcp_wire::v6::MessageType;
use dhcp_wire::{
    Dhcp4, Dhcp6, DhcpOption, IaAddress, IaKind, IaPrefix, IdentityAssociation, Message,
    RelayAgentInfo, RelayMessage,
};
use dhcpstats::{Counter, Increment, LineLogger, MetricsSink, StatsConfig};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, Mutex};

pub const MAC: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];
pub const GIADDR: Ipv4Addr = Ipv4Addr::new(10, 99, 99, 1);

/// Sink that keeps every increment for inspection.
#[derive(Default)]
pub struct RecordingSink {
    increments: Mutex<Vec<Increment>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take(&self) -> Vec<Increment> {
        std::mem::take(&mut *self.increments.lock().unwrap())
    }

    /// Sum of amounts recorded for `counter` with exactly `labels`.
    pub fn total(&self, counter: Counter, labels: &[&str]) -> u64 {
        self.increments
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.counter == counter && i.labels == labels)
            .map(|i| i.amount)
            .sum()
    }

    /// Sum of amounts recorded for `counter`, any labels.
    pub fn total_any(&self, counter: Counter) -> u64 {
        self.increments
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.counter == counter)
            .map(|i| i.amount)
            .sum()
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, increment: &Increment) {
        self.increments.lock().unwrap().push(increment.clone());
    }
}

/// Logger that keeps every line.
#[derive(Clone, Default)]
pub struct CapturedLines(Arc<Mutex<Vec<String>>>);

impl CapturedLines {
    pub fn logger(&self) -> LineLogger {
        let lines = Arc::clone(&self.0);
        Arc::new(move |line: &str| lines.lock().unwrap().push(line.to_string()))
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub fn config() -> StatsConfig {
    StatsConfig::default()
}

pub fn iaid(n: u8) -> [u8; 4] {
    [0, 0, 0, n]
}

pub fn requested(kind: IaKind, n: u8) -> IdentityAssociation {
    IdentityAssociation::new(kind, iaid(n))
}

pub fn granted(kind: IaKind, n: u8) -> IdentityAssociation {
    let resource = match kind {
        IaKind::Na | IaKind::Ta => DhcpOption::IaAddress(IaAddress::new(
            Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, u16::from(n)),
            3600,
            7200,
        )),
        IaKind::Pd => DhcpOption::IaPrefix(IaPrefix::new(
            Ipv6Addr::new(0x2001, 0xdb8, u16::from(n), 0, 0, 0, 0, 0),
            56,
            3600,
            7200,
        )),
    };
    IdentityAssociation::new(kind, iaid(n)).with_option(resource)
}

pub fn client_message(msg_type: MessageType, ias: Vec<IdentityAssociation>) -> Message {
    let mut msg = Message::new(msg_type, [0x0A, 0x0B, 0x0C])
        .with_option(DhcpOption::ClientId(vec![0, 1, 0, 1, 0xAA, 0xBB, 0xCC, 0xDD]));
    for ia in ias {
        msg.add_option(DhcpOption::Ia(ia));
    }
    msg
}

pub fn request6(ias: Vec<IdentityAssociation>) -> Dhcp6 {
    Dhcp6::Client(client_message(MessageType::Request, ias))
}

pub fn reply6(ias: Vec<IdentityAssociation>) -> Dhcp6 {
    Dhcp6::Client(client_message(MessageType::Reply, ias))
}

/// Wraps `msg` in `levels` RELAY-FORW envelopes.
pub fn relayed(msg: Dhcp6, levels: u8) -> Dhcp6 {
    let mut msg = msg;
    for hop in 0..levels {
        let relay = RelayMessage::encapsulate(
            MessageType::RelayForward,
            &msg,
            hop,
            Ipv6Addr::new(0x2001, 0xdb8, 0, 1, 0, 0, 0, 1),
            Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, u16::from(hop) + 1),
        )
        .unwrap()
        .with_option(DhcpOption::InterfaceId(b"eth0".to_vec()));
        msg = Dhcp6::Relay(relay);
    }
    msg
}

/// A RELAY-FORW whose relay message option holds garbage.
pub fn corrupt_relay() -> Dhcp6 {
    Dhcp6::Relay(RelayMessage {
        msg_type: MessageType::RelayForward,
        hop_count: 0,
        link_address: Ipv6Addr::UNSPECIFIED,
        peer_address: Ipv6Addr::LOCALHOST,
        options: dhcp_wire::Options::from(vec![DhcpOption::RelayMessage(vec![3, 0xFF])]),
    })
}

pub fn discover4() -> Dhcp4 {
    Dhcp4::request(MessageType4::Discover, 0x1234_5678, MAC)
}

pub fn circuit_rai(circuit: &[u8]) -> RelayAgentInfo {
    RelayAgentInfo::new().with(rai_suboption::CIRCUIT_ID, circuit)
}

pub fn with_relay(mut msg: Dhcp4, giaddr: Option<Ipv4Addr>, rai: Option<&RelayAgentInfo>) -> Dhcp4 {
    if let Some(gw) = giaddr {
        msg.giaddr = gw;
    }
    if let Some(rai) = rai {
        msg.set_relay_agent_info(rai).unwrap();
    }
    msg
}
