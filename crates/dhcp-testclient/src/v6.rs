use crate::transport::Transport;
use anyhow::{bail, Context};
use dhcp_wire::v6::MessageType;
use dhcp_wire::{Dhcp6, DhcpOption, IaKind, IdentityAssociation, Message, RelayMessage};
use std::net::Ipv6Addr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{error, info};

/// Seconds between the Unix epoch and 2000-01-01T00:00:00Z.
const DUID_EPOCH_OFFSET: u64 = 946_684_800;

const DUID_LLT: u16 = 1;
const HWTYPE_ETHERNET: u16 = 1;

/// DUID-LLT for `mac`, stamped with `now`.
#[must_use]
pub fn duid_llt(mac: [u8; 6], now: SystemTime) -> Vec<u8> {
    let secs = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        .saturating_sub(DUID_EPOCH_OFFSET);
    let time = u32::try_from(secs).unwrap_or(u32::MAX);

    let mut duid = Vec::with_capacity(14);
    duid.extend_from_slice(&DUID_LLT.to_be_bytes());
    duid.extend_from_slice(&HWTYPE_ETHERNET.to_be_bytes());
    duid.extend_from_slice(&time.to_be_bytes());
    duid.extend_from_slice(&mac);
    duid
}

/// Transaction id derived from the clock.
#[must_use]
pub fn transaction_id(now: SystemTime) -> [u8; 3] {
    let nanos = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .subsec_nanos()
        .to_be_bytes();
    [nanos[1], nanos[2], nanos[3]]
}

/// IAID the client uses for its single IA_NA.
#[must_use]
pub const fn iaid(mac: [u8; 6]) -> [u8; 4] {
    [mac[2], mac[3], mac[4], mac[5]]
}

/// A SOLICIT asking for one IA_NA.
#[must_use]
pub fn solicit(client_id: &[u8], xid: [u8; 3], iaid: [u8; 4]) -> Message {
    Message::new(MessageType::Solicit, xid)
        .with_option(DhcpOption::ClientId(client_id.to_vec()))
        .with_option(DhcpOption::Ia(IdentityAssociation::new(IaKind::Na, iaid)))
}

/// A REQUEST following up on `advertise`.
///
/// # Errors
///
/// Returns an error if the advertise carries no server id.
pub fn request_from(advertise: &Message, client_id: &[u8], iaid: [u8; 4]) -> anyhow::Result<Message> {
    let server_id = advertise
        .options
        .server_id()
        .context("advertise carries no server id")?;
    let mut msg = Message::new(MessageType::Request, advertise.transaction_id)
        .with_option(DhcpOption::ClientId(client_id.to_vec()))
        .with_option(DhcpOption::ServerId(server_id.to_vec()));

    let offered: Vec<_> = advertise.options.ias(IaKind::Na).cloned().collect();
    if offered.is_empty() {
        msg.add_option(DhcpOption::Ia(IdentityAssociation::new(IaKind::Na, iaid)));
    } else {
        for ia in offered {
            msg.add_option(DhcpOption::Ia(ia));
        }
    }
    Ok(msg)
}

/// Wraps `msg` in a RELAY-FORW carrying `interface_id`.
///
/// # Errors
///
/// Returns an error if `msg` is too large to encapsulate.
pub fn relay_forward(msg: Message, peer: Ipv6Addr, interface_id: &[u8]) -> anyhow::Result<Dhcp6> {
    let relay = RelayMessage::encapsulate(
        MessageType::RelayForward,
        &Dhcp6::Client(msg),
        0,
        Ipv6Addr::UNSPECIFIED,
        peer,
    )?
    .with_option(DhcpOption::InterfaceId(interface_id.to_vec()));
    Ok(Dhcp6::Relay(relay))
}

/// Logs `msg` and, for relay messages, what it encapsulates. Returns the
/// innermost client message.
pub fn summarise(msg: &Dhcp6) -> Option<Message> {
    info!("{msg}");
    let mut current = msg.clone();
    loop {
        match current {
            Dhcp6::Client(m) => return Some(m),
            Dhcp6::Relay(relay) => match relay.inner_message() {
                Ok(inner) => {
                    info!("decapsulated {inner}");
                    current = inner;
                }
                Err(e) => {
                    error!("could not decapsulate: {e}");
                    return None;
                }
            },
        }
    }
}

async fn send_and_await(
    transport: &Transport,
    msg: &Dhcp6,
    expected: MessageType,
) -> anyhow::Result<Message> {
    summarise(msg);
    transport.send(&msg.serialize()?).await?;
    let reply = Dhcp6::parse(&transport.recv().await?)?;
    let Some(inner) = summarise(&reply) else {
        bail!("reply could not be decapsulated");
    };
    if inner.msg_type != expected {
        bail!("expected {expected}, got {}", inner.msg_type);
    }
    Ok(inner)
}

/// Runs SOLICIT / ADVERTISE / REQUEST / REPLY through a simulated relay.
/// Returns the server's REPLY.
///
/// # Errors
///
/// Returns an error if the server does not answer in time or answers
/// with something unexpected.
pub async fn exchange(transport: &Transport, mac: [u8; 6], interface_id: &[u8]) -> anyhow::Result<Message> {
    let peer = match transport.local_addr()?.ip() {
        std::net::IpAddr::V6(ip) => ip,
        std::net::IpAddr::V4(ip) => ip.to_ipv6_mapped(),
    };
    let now = SystemTime::now();
    let client_id = duid_llt(mac, now);
    let iaid = iaid(mac);

    let solicit = relay_forward(solicit(&client_id, transaction_id(now), iaid), peer, interface_id)?;
    let advertise = send_and_await(transport, &solicit, MessageType::Advertise).await?;

    let request = relay_forward(request_from(&advertise, &client_id, iaid)?, peer, interface_id)?;
    send_and_await(transport, &request, MessageType::Reply).await
}
