//! DHCPv6 message model and binary codec.
//!
//! A DHCPv6 datagram is either a client/server message
//! (`type(1) transaction-id(3) options`) or a relay message
//! (`type(1) hop-count(1) link-address(16) peer-address(16) options`).
//! Options are `code(2) length(2) data`, big-endian.
//!
//! A relay message keeps the message it wraps in encoded form inside its
//! Relay Message option; [`RelayMessage::inner_message`] decodes one level
//! on demand.

use crate::error::{DecodeError, EncodeError};
use crate::ia::{IaAddress, IaKind, IaPrefix, IdentityAssociation};
use crate::types::{option_code, status_code};
use crate::wire::{hex, put_option16, Reader};
use std::fmt;
use std::net::Ipv6Addr;

/// Deepest level of option encapsulation accepted (message → IA → address → …).
pub const MAX_OPTION_NESTING: usize = 4;

/// Length of a relay message header (type, hop count, link and peer address).
pub const RELAY_HEADER_LEN: usize = 34;

/// DHCPv6 message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// SOLICIT (1).
    Solicit,
    /// ADVERTISE (2).
    Advertise,
    /// REQUEST (3).
    Request,
    /// CONFIRM (4).
    Confirm,
    /// RENEW (5).
    Renew,
    /// REBIND (6).
    Rebind,
    /// REPLY (7).
    Reply,
    /// RELEASE (8).
    Release,
    /// DECLINE (9).
    Decline,
    /// RECONFIGURE (10).
    Reconfigure,
    /// INFORMATION-REQUEST (11).
    InformationRequest,
    /// RELAY-FORW (12).
    RelayForward,
    /// RELAY-REPL (13).
    RelayReply,
    /// Any other value.
    Other(u8),
}

impl MessageType {
    /// `true` for RELAY-FORW and RELAY-REPL.
    #[must_use]
    pub const fn is_relay(self) -> bool {
        matches!(self, Self::RelayForward | Self::RelayReply)
    }

    /// Protocol name, or `None` for unassigned values.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::Solicit => "SOLICIT",
            Self::Advertise => "ADVERTISE",
            Self::Request => "REQUEST",
            Self::Confirm => "CONFIRM",
            Self::Renew => "RENEW",
            Self::Rebind => "REBIND",
            Self::Reply => "REPLY",
            Self::Release => "RELEASE",
            Self::Decline => "DECLINE",
            Self::Reconfigure => "RECONFIGURE",
            Self::InformationRequest => "INFORMATION-REQUEST",
            Self::RelayForward => "RELAY-FORW",
            Self::RelayReply => "RELAY-REPL",
            Self::Other(_) => return None,
        })
    }
}

impl From<u8> for MessageType {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::Solicit,
            2 => Self::Advertise,
            3 => Self::Request,
            4 => Self::Confirm,
            5 => Self::Renew,
            6 => Self::Rebind,
            7 => Self::Reply,
            8 => Self::Release,
            9 => Self::Decline,
            10 => Self::Reconfigure,
            11 => Self::InformationRequest,
            12 => Self::RelayForward,
            13 => Self::RelayReply,
            other => Self::Other(other),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(t: MessageType) -> Self {
        match t {
            MessageType::Solicit => 1,
            MessageType::Advertise => 2,
            MessageType::Request => 3,
            MessageType::Confirm => 4,
            MessageType::Renew => 5,
            MessageType::Rebind => 6,
            MessageType::Reply => 7,
            MessageType::Release => 8,
            MessageType::Decline => 9,
            MessageType::Reconfigure => 10,
            MessageType::InformationRequest => 11,
            MessageType::RelayForward => 12,
            MessageType::RelayReply => 13,
            MessageType::Other(v) => v,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown ({})", u8::from(*self)),
        }
    }
}

/// Status Code option (code 13).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCode {
    /// Numeric status.
    pub code: u16,
    /// Free-form UTF-8 message.
    pub message: String,
}

impl StatusCode {
    /// Creates a status code option.
    #[must_use]
    pub fn new(code: u16, message: &str) -> Self {
        Self {
            code,
            message: message.to_owned(),
        }
    }

    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        let code = r.u16()?;
        let message = String::from_utf8_lossy(r.rest()).into_owned();
        Ok(Self { code, message })
    }

    fn encode_body(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(2 + self.message.len());
        v.extend_from_slice(&self.code.to_be_bytes());
        v.extend_from_slice(self.message.as_bytes());
        v
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode{{{}", status_code::name(self.code))?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        f.write_str("}")
    }
}

/// A decoded DHCPv6 option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhcpOption {
    /// Client Identifier (opaque DUID).
    ClientId(Vec<u8>),
    /// Server Identifier (opaque DUID).
    ServerId(Vec<u8>),
    /// IA_NA, IA_TA or IA_PD.
    Ia(IdentityAssociation),
    /// IA Address.
    IaAddress(IaAddress),
    /// IA Prefix.
    IaPrefix(IaPrefix),
    /// Relay Message: the encoded message wrapped by a relay.
    RelayMessage(Vec<u8>),
    /// Status Code.
    StatusCode(StatusCode),
    /// Interface-Id supplied by a relay.
    InterfaceId(Vec<u8>),
    /// Any option the codec does not interpret, kept verbatim.
    Unknown {
        /// Option code.
        code: u16,
        /// Raw option data.
        data: Vec<u8>,
    },
}

impl DhcpOption {
    /// Wire option code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::ClientId(_) => option_code::CLIENT_ID,
            Self::ServerId(_) => option_code::SERVER_ID,
            Self::Ia(ia) => ia.kind.option_code(),
            Self::IaAddress(_) => option_code::IA_ADDR,
            Self::IaPrefix(_) => option_code::IA_PREFIX,
            Self::RelayMessage(_) => option_code::RELAY_MSG,
            Self::StatusCode(_) => option_code::STATUS_CODE,
            Self::InterfaceId(_) => option_code::INTERFACE_ID,
            Self::Unknown { code, .. } => *code,
        }
    }

    fn decode(code: u16, data: &[u8], depth: usize) -> Result<Self, DecodeError> {
        if let Some(kind) = IaKind::from_option_code(code) {
            return Ok(Self::Ia(IdentityAssociation::decode(kind, data, depth)?));
        }
        Ok(match code {
            option_code::CLIENT_ID => Self::ClientId(data.to_vec()),
            option_code::SERVER_ID => Self::ServerId(data.to_vec()),
            option_code::IA_ADDR => Self::IaAddress(IaAddress::decode(data, depth)?),
            option_code::IA_PREFIX => Self::IaPrefix(IaPrefix::decode(data, depth)?),
            option_code::RELAY_MSG => Self::RelayMessage(data.to_vec()),
            option_code::STATUS_CODE => Self::StatusCode(StatusCode::decode(data)?),
            option_code::INTERFACE_ID => Self::InterfaceId(data.to_vec()),
            _ => Self::Unknown {
                code,
                data: data.to_vec(),
            },
        })
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let code = self.code();
        match self {
            Self::ClientId(d)
            | Self::ServerId(d)
            | Self::RelayMessage(d)
            | Self::InterfaceId(d)
            | Self::Unknown { data: d, .. } => put_option16(out, code, d),
            Self::Ia(ia) => put_option16(out, code, &ia.encode_body()?),
            Self::IaAddress(a) => put_option16(out, code, &a.encode_body()?),
            Self::IaPrefix(p) => put_option16(out, code, &p.encode_body()?),
            Self::StatusCode(s) => put_option16(out, code, &s.encode_body()),
        }
    }
}

impl fmt::Display for DhcpOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientId(d) => write!(f, "ClientId({})", hex(d)),
            Self::ServerId(d) => write!(f, "ServerId({})", hex(d)),
            Self::Ia(ia) => fmt::Display::fmt(ia, f),
            Self::IaAddress(a) => fmt::Display::fmt(a, f),
            Self::IaPrefix(p) => fmt::Display::fmt(p, f),
            Self::RelayMessage(d) => write!(f, "RelayMessage({} bytes)", d.len()),
            Self::StatusCode(s) => fmt::Display::fmt(s, f),
            Self::InterfaceId(d) => write!(f, "InterfaceId({})", String::from_utf8_lossy(d)),
            Self::Unknown { code, data } => write!(f, "Option{code}({})", hex(data)),
        }
    }
}

/// Ordered list of options carried by a message or an encapsulating option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options(Vec<DhcpOption>);

impl Options {
    /// An empty option list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an option.
    pub fn push(&mut self, option: DhcpOption) {
        self.0.push(option);
    }

    /// Iterate over options in wire order.
    pub fn iter(&self) -> std::slice::Iter<'_, DhcpOption> {
        self.0.iter()
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identity associations of the given kind, in wire order.
    pub fn ias(&self, kind: IaKind) -> impl Iterator<Item = &IdentityAssociation> + '_ {
        self.0.iter().filter_map(move |o| match o {
            DhcpOption::Ia(ia) if ia.kind == kind => Some(ia),
            _ => None,
        })
    }

    /// IA Address options at this level.
    pub fn addresses(&self) -> impl Iterator<Item = &IaAddress> + '_ {
        self.0.iter().filter_map(|o| match o {
            DhcpOption::IaAddress(a) => Some(a),
            _ => None,
        })
    }

    /// IA Prefix options at this level.
    pub fn prefixes(&self) -> impl Iterator<Item = &IaPrefix> + '_ {
        self.0.iter().filter_map(|o| match o {
            DhcpOption::IaPrefix(p) => Some(p),
            _ => None,
        })
    }

    /// First Status Code option at this level.
    #[must_use]
    pub fn status_code(&self) -> Option<&StatusCode> {
        self.0.iter().find_map(|o| match o {
            DhcpOption::StatusCode(s) => Some(s),
            _ => None,
        })
    }

    /// Contents of the first Relay Message option.
    #[must_use]
    pub fn relay_message(&self) -> Option<&[u8]> {
        self.0.iter().find_map(|o| match o {
            DhcpOption::RelayMessage(d) => Some(d.as_slice()),
            _ => None,
        })
    }

    /// Contents of the first Interface-Id option.
    #[must_use]
    pub fn interface_id(&self) -> Option<&[u8]> {
        self.0.iter().find_map(|o| match o {
            DhcpOption::InterfaceId(d) => Some(d.as_slice()),
            _ => None,
        })
    }

    /// Contents of the first Client Identifier option.
    #[must_use]
    pub fn client_id(&self) -> Option<&[u8]> {
        self.0.iter().find_map(|o| match o {
            DhcpOption::ClientId(d) => Some(d.as_slice()),
            _ => None,
        })
    }

    /// Contents of the first Server Identifier option.
    #[must_use]
    pub fn server_id(&self) -> Option<&[u8]> {
        self.0.iter().find_map(|o| match o {
            DhcpOption::ServerId(d) => Some(d.as_slice()),
            _ => None,
        })
    }

    pub(crate) fn decode(data: &[u8], depth: usize) -> Result<Self, DecodeError> {
        if depth > MAX_OPTION_NESTING {
            return Err(DecodeError::NestingTooDeep {
                max: MAX_OPTION_NESTING,
            });
        }
        let mut r = Reader::new(data);
        let mut options = Vec::new();
        while !r.is_empty() {
            let code = r.u16()?;
            let declared = usize::from(r.u16()?);
            if r.remaining() < declared {
                return Err(DecodeError::OptionTruncated {
                    code,
                    declared,
                    available: r.remaining(),
                });
            }
            let body = r.take(declared)?;
            options.push(DhcpOption::decode(code, body, depth)?);
        }
        Ok(Self(options))
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        for option in &self.0 {
            option.encode(out)?;
        }
        Ok(())
    }
}

impl From<Vec<DhcpOption>> for Options {
    fn from(options: Vec<DhcpOption>) -> Self {
        Self(options)
    }
}

impl<'a> IntoIterator for &'a Options {
    type Item = &'a DhcpOption;
    type IntoIter = std::slice::Iter<'a, DhcpOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, option) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(option, f)?;
        }
        f.write_str("]")
    }
}

/// A client or server message (anything that is not a relay envelope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message type.
    pub msg_type: MessageType,
    /// 24-bit transaction id.
    pub transaction_id: [u8; 3],
    /// Options in wire order.
    pub options: Options,
}

impl Message {
    /// Creates a message with no options.
    #[must_use]
    pub const fn new(msg_type: MessageType, transaction_id: [u8; 3]) -> Self {
        Self {
            msg_type,
            transaction_id,
            options: Options::new(),
        }
    }

    /// Builder-style option append.
    #[must_use]
    pub fn with_option(mut self, option: DhcpOption) -> Self {
        self.options.push(option);
        self
    }

    /// Append an option.
    pub fn add_option(&mut self, option: DhcpOption) {
        self.options.push(option);
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} xid=0x{} options={}",
            self.msg_type,
            hex(&self.transaction_id),
            self.options
        )
    }
}

/// A RELAY-FORW or RELAY-REPL envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    /// RELAY-FORW or RELAY-REPL.
    pub msg_type: MessageType,
    /// Number of relays the message has passed through.
    pub hop_count: u8,
    /// Address identifying the client's link.
    pub link_address: Ipv6Addr,
    /// Address of the client or relay the message came from.
    pub peer_address: Ipv6Addr,
    /// Relay options, including the Relay Message option.
    pub options: Options,
}

impl RelayMessage {
    /// Wraps `inner` in a relay envelope of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if `inner` does not fit in a single option.
    pub fn encapsulate(
        msg_type: MessageType,
        inner: &Dhcp6,
        hop_count: u8,
        link_address: Ipv6Addr,
        peer_address: Ipv6Addr,
    ) -> Result<Self, EncodeError> {
        let mut options = Options::new();
        options.push(DhcpOption::RelayMessage(inner.serialize()?));
        Ok(Self {
            msg_type,
            hop_count,
            link_address,
            peer_address,
            options,
        })
    }

    /// Builder-style option append.
    #[must_use]
    pub fn with_option(mut self, option: DhcpOption) -> Self {
        self.options.push(option);
        self
    }

    /// Decodes the message carried in the Relay Message option.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingRelayMessage`] when the envelope is
    /// empty and [`DecodeError::MalformedEnvelope`] when its contents do
    /// not decode.
    pub fn inner_message(&self) -> Result<Dhcp6, DecodeError> {
        let data = self
            .options
            .relay_message()
            .ok_or(DecodeError::MissingRelayMessage)?;
        Dhcp6::parse(data).map_err(|e| DecodeError::MalformedEnvelope(Box::new(e)))
    }
}

impl fmt::Display for RelayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hop={} link={} peer={} options={}",
            self.msg_type, self.hop_count, self.link_address, self.peer_address, self.options
        )
    }
}

/// Any DHCPv6 datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dhcp6 {
    /// A client or server message.
    Client(Message),
    /// A relay envelope.
    Relay(RelayMessage),
}

impl Dhcp6 {
    /// Returns `true` if this is a relay envelope.
    #[must_use]
    pub const fn is_relay(&self) -> bool {
        matches!(self, Self::Relay(_))
    }

    /// Message type of the outermost message.
    #[must_use]
    pub const fn msg_type(&self) -> MessageType {
        match self {
            Self::Client(m) => m.msg_type,
            Self::Relay(r) => r.msg_type,
        }
    }

    /// The client message, if this is not a relay envelope.
    #[must_use]
    pub const fn as_client(&self) -> Option<&Message> {
        match self {
            Self::Client(m) => Some(m),
            Self::Relay(_) => None,
        }
    }

    /// Options of the outermost message.
    #[must_use]
    pub const fn options(&self) -> &Options {
        match self {
            Self::Client(m) => &m.options,
            Self::Relay(r) => &r.options,
        }
    }

    /// Parses a DHCPv6 datagram. Relay envelopes are decoded one level only.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the data is empty, shorter than the
    /// message header, or carries a malformed option.
    ///
    /// # Examples
    ///
    /// ```
    /// use dhcp_wire::v6::{Dhcp6, Message, MessageType};
    /// let msg = Dhcp6::Client(Message::new(MessageType::Solicit, [1, 2, 3]));
    /// let bytes = msg.serialize().unwrap();
    /// assert_eq!(Dhcp6::parse(&bytes).unwrap(), msg);
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }
        let mut r = Reader::new(data);
        let msg_type = MessageType::from(r.u8()?);
        if msg_type.is_relay() {
            if data.len() < RELAY_HEADER_LEN {
                return Err(DecodeError::TooShort {
                    expected: RELAY_HEADER_LEN,
                    actual: data.len(),
                });
            }
            return Ok(Self::Relay(RelayMessage {
                msg_type,
                hop_count: r.u8()?,
                link_address: r.ipv6()?,
                peer_address: r.ipv6()?,
                options: Options::decode(r.rest(), 0)?,
            }));
        }
        Ok(Self::Client(Message {
            msg_type,
            transaction_id: r.array()?,
            options: Options::decode(r.rest(), 0)?,
        }))
    }

    /// Serializes this datagram.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if an option is too long for its length field.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Client(m) => {
                let mut v = Vec::with_capacity(64);
                v.push(u8::from(m.msg_type));
                v.extend_from_slice(&m.transaction_id);
                m.options.encode(&mut v)?;
                Ok(v)
            }
            Self::Relay(r) => {
                let mut v = Vec::with_capacity(RELAY_HEADER_LEN + 64);
                v.push(u8::from(r.msg_type));
                v.push(r.hop_count);
                v.extend_from_slice(&r.link_address.octets());
                v.extend_from_slice(&r.peer_address.octets());
                r.options.encode(&mut v)?;
                Ok(v)
            }
        }
    }
}

impl From<Message> for Dhcp6 {
    fn from(m: Message) -> Self {
        Self::Client(m)
    }
}

impl From<RelayMessage> for Dhcp6 {
    fn from(r: RelayMessage) -> Self {
        Self::Relay(r)
    }
}

impl fmt::Display for Dhcp6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(m) => fmt::Display::fmt(m, f),
            Self::Relay(r) => fmt::Display::fmt(r, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solicit() -> Message {
        Message::new(MessageType::Solicit, [0x0A, 0x0B, 0x0C])
            .with_option(DhcpOption::ClientId(vec![0, 1, 0, 1]))
            .with_option(DhcpOption::Ia(IdentityAssociation::new(
                IaKind::Na,
                [1, 2, 3, 4],
            )))
    }

    #[test]
    fn client_message_layout() {
        let bytes = Dhcp6::Client(solicit()).serialize().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..4], &[0x0A, 0x0B, 0x0C]);
        // client id option header
        assert_eq!(&bytes[4..8], &[0, 1, 0, 4]);
    }

    #[test]
    fn relay_header_is_parsed() {
        let inner = Dhcp6::Client(solicit());
        let relay = RelayMessage::encapsulate(
            MessageType::RelayForward,
            &inner,
            3,
            "2001:db8::1".parse().unwrap(),
            "fe80::1".parse().unwrap(),
        )
        .unwrap()
        .with_option(DhcpOption::InterfaceId(b"eth0".to_vec()));
        let bytes = Dhcp6::Relay(relay).serialize().unwrap();

        let Dhcp6::Relay(parsed) = Dhcp6::parse(&bytes).unwrap() else {
            panic!("expected relay message");
        };
        assert_eq!(parsed.hop_count, 3);
        assert_eq!(parsed.peer_address, "fe80::1".parse::<Ipv6Addr>().unwrap());
        assert_eq!(parsed.options.interface_id(), Some(&b"eth0"[..]));
        assert_eq!(parsed.inner_message().unwrap(), inner);
    }

    #[test]
    fn relay_without_relay_message_option() {
        let relay = RelayMessage {
            msg_type: MessageType::RelayForward,
            hop_count: 0,
            link_address: Ipv6Addr::UNSPECIFIED,
            peer_address: Ipv6Addr::UNSPECIFIED,
            options: Options::new(),
        };
        assert_eq!(relay.inner_message(), Err(DecodeError::MissingRelayMessage));
    }

    #[test]
    fn corrupt_inner_message_is_malformed_envelope() {
        let mut relay = RelayMessage {
            msg_type: MessageType::RelayForward,
            hop_count: 0,
            link_address: Ipv6Addr::UNSPECIFIED,
            peer_address: Ipv6Addr::UNSPECIFIED,
            options: Options::new(),
        };
        relay.options.push(DhcpOption::RelayMessage(vec![1, 2]));
        let err = relay.inner_message().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEnvelope(_)));
        assert_eq!(err.reason(), "malformed-envelope");
    }

    #[test]
    fn empty_datagram_is_error() {
        assert_eq!(Dhcp6::parse(&[]), Err(DecodeError::Empty));
    }

    #[test]
    fn short_relay_header_is_error() {
        assert!(matches!(
            Dhcp6::parse(&[12, 0, 0, 0]),
            Err(DecodeError::TooShort {
                expected: RELAY_HEADER_LEN,
                actual: 4
            })
        ));
    }

    #[test]
    fn truncated_option_is_error() {
        // SOLICIT, xid, option 1 declaring 8 bytes but carrying 2
        let bytes = [1, 0, 0, 1, 0, 1, 0, 8, 0xAA, 0xBB];
        assert!(matches!(
            Dhcp6::parse(&bytes),
            Err(DecodeError::OptionTruncated {
                code: 1,
                declared: 8,
                available: 2
            })
        ));
    }

    #[test]
    fn unknown_options_survive_round_trip() {
        let msg = Dhcp6::Client(
            Message::new(MessageType::Reply, [0; 3]).with_option(DhcpOption::Unknown {
                code: 23,
                data: vec![0x20, 0x01],
            }),
        );
        let bytes = msg.serialize().unwrap();
        assert_eq!(Dhcp6::parse(&bytes).unwrap(), msg);
    }

    #[test]
    fn deeply_nested_options_are_rejected() {
        // IA_NA containing IA_NA containing ... beyond the nesting bound
        let mut body: Vec<u8> = Vec::new();
        for _ in 0..=MAX_OPTION_NESTING + 1 {
            let mut ia = vec![0u8; 12];
            ia.extend_from_slice(&body);
            let mut opt = Vec::new();
            put_option16(&mut opt, option_code::IA_NA, &ia).unwrap();
            body = opt;
        }
        let mut bytes = vec![7, 0, 0, 0];
        bytes.extend_from_slice(&body);
        assert_eq!(
            Dhcp6::parse(&bytes),
            Err(DecodeError::NestingTooDeep {
                max: MAX_OPTION_NESTING
            })
        );
    }

    #[test]
    fn message_type_names() {
        assert_eq!(MessageType::Solicit.to_string(), "SOLICIT");
        assert_eq!(MessageType::InformationRequest.to_string(), "INFORMATION-REQUEST");
        assert_eq!(MessageType::RelayForward.to_string(), "RELAY-FORW");
        assert_eq!(MessageType::from(99).to_string(), "unknown (99)");
    }

    #[test]
    fn options_filter_ias_by_kind() {
        let mut options = Options::new();
        options.push(DhcpOption::Ia(IdentityAssociation::new(IaKind::Na, [1; 4])));
        options.push(DhcpOption::Ia(IdentityAssociation::new(IaKind::Pd, [2; 4])));
        options.push(DhcpOption::Ia(IdentityAssociation::new(IaKind::Na, [3; 4])));
        let na: Vec<_> = options.ias(IaKind::Na).map(|ia| ia.iaid).collect();
        assert_eq!(na, vec![[1; 4], [3; 4]]);
        assert_eq!(options.ias(IaKind::Ta).count(), 0);
    }

    #[test]
    fn display_summarises_message() {
        let msg = Message::new(MessageType::Reply, [0, 0, 1]).with_option(DhcpOption::Ia(
            IdentityAssociation::denial(IaKind::Pd, [0xDE, 0xAD, 0xBE, 0xEF]),
        ));
        assert_eq!(
            msg.to_string(),
            "REPLY xid=0x000001 options=[IA_PD{iaid=deadbeef t1=0 t2=0 options=[StatusCode{NoPrefixAvail}]}]"
        );
    }
}
