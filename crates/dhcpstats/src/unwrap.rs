use dhcp_wire::{DecodeError, Dhcp6, Message};

/// The innermost client message of a (possibly relayed) DHCPv6 exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
    /// The client message.
    pub message: Message,
    /// Number of relay envelopes that were removed.
    pub depth: usize,
}

/// Strips relay envelopes until a client message is reached.
///
/// Opens at most `max_depth` envelopes. A client message is returned
/// unchanged with depth 0.
///
/// # Errors
///
/// Returns [`DecodeError::MissingRelayMessage`] or
/// [`DecodeError::MalformedEnvelope`] if an envelope carries no inner
/// message or the inner message does not decode, and
/// [`DecodeError::RelayTooDeep`] if more than `max_depth` envelopes are
/// stacked.
///
/// # Examples
///
/// ```
/// use dhcp_wire::v6::MessageType;
/// use dhcp_wire::{Dhcp6, Message, RelayMessage};
/// use dhcpstats::unwrap::unwrap;
/// use std::net::Ipv6Addr;
///
/// let solicit = Dhcp6::Client(Message::new(MessageType::Solicit, [1, 2, 3]));
/// let relayed = RelayMessage::encapsulate(
///     MessageType::RelayForward,
///     &solicit,
///     0,
///     Ipv6Addr::UNSPECIFIED,
///     Ipv6Addr::LOCALHOST,
/// )
/// .unwrap();
///
/// let inner = unwrap(Dhcp6::Relay(relayed), 8).unwrap();
/// assert_eq!(inner.depth, 1);
/// assert_eq!(inner.message.msg_type, MessageType::Solicit);
/// ```
pub fn unwrap(msg: Dhcp6, max_depth: usize) -> Result<Unwrapped, DecodeError> {
    let mut current = msg;
    let mut depth = 0;
    loop {
        match current {
            Dhcp6::Client(message) => return Ok(Unwrapped { message, depth }),
            Dhcp6::Relay(relay) => {
                if depth >= max_depth {
                    return Err(DecodeError::RelayTooDeep { max: max_depth });
                }
                current = relay.inner_message()?;
                depth += 1;
            }
        }
    }
}
