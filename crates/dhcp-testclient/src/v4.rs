use crate::transport::Transport;
use anyhow::bail;
use dhcp_wire::types::v4::{option_code, rai_suboption};
use dhcp_wire::v4::MessageType;
use dhcp_wire::{Dhcp4, RelayAgentInfo};
use std::net::Ipv4Addr;
use tracing::info;

/// Relay parameters the simulated relay stamps on every request.
#[derive(Debug, Clone)]
pub struct RelayParams {
    /// Gateway address (giaddr).
    pub giaddr: Ipv4Addr,
    /// Agent circuit id.
    pub circuit_id: Vec<u8>,
}

impl RelayParams {
    fn apply(&self, msg: &mut Dhcp4) -> anyhow::Result<()> {
        msg.giaddr = self.giaddr;
        msg.hops = 1;
        msg.set_relay_agent_info(
            &RelayAgentInfo::new().with(rai_suboption::CIRCUIT_ID, &self.circuit_id),
        )?;
        Ok(())
    }
}

/// A relayed DHCPDISCOVER.
///
/// # Errors
///
/// Returns an error if the circuit id exceeds 255 bytes.
pub fn discover(mac: [u8; 6], xid: u32, relay: &RelayParams) -> anyhow::Result<Dhcp4> {
    let mut msg = Dhcp4::request(MessageType::Discover, xid, mac);
    relay.apply(&mut msg)?;
    Ok(msg)
}

/// A relayed DHCPREQUEST accepting `offer`.
///
/// # Errors
///
/// Returns an error if the circuit id exceeds 255 bytes.
pub fn request_from(offer: &Dhcp4, mac: [u8; 6], relay: &RelayParams) -> anyhow::Result<Dhcp4> {
    let mut msg = Dhcp4::request(MessageType::Request, offer.xid, mac);
    msg.set_option(option_code::REQUESTED_IP, offer.yiaddr.octets().to_vec());
    if let Some(server_id) = offer.option(option_code::SERVER_ID) {
        msg.set_option(option_code::SERVER_ID, server_id.to_vec());
    }
    relay.apply(&mut msg)?;
    Ok(msg)
}

async fn send_and_await(
    transport: &Transport,
    msg: &Dhcp4,
    expected: MessageType,
) -> anyhow::Result<Dhcp4> {
    info!("{msg}");
    transport.send(&msg.serialize()?).await?;
    loop {
        let reply = Dhcp4::parse(&transport.recv().await?)?;
        info!("{reply}");
        if reply.xid != msg.xid {
            continue;
        }
        match reply.message_type() {
            Some(t) if t == expected => return Ok(reply),
            Some(t) => bail!("expected {expected}, got {t}"),
            None => bail!("reply carries no message type"),
        }
    }
}

/// Runs DISCOVER / OFFER / REQUEST / ACK as a relay would. Returns the
/// server's ACK.
///
/// # Errors
///
/// Returns an error if the server does not answer in time or answers
/// with something unexpected.
pub async fn exchange(
    transport: &Transport,
    mac: [u8; 6],
    xid: u32,
    relay: &RelayParams,
) -> anyhow::Result<Dhcp4> {
    let offer = send_and_await(transport, &discover(mac, xid, relay)?, MessageType::Offer).await?;
    let request = request_from(&offer, mac, relay)?;
    send_and_await(transport, &request, MessageType::Ack).await
}
