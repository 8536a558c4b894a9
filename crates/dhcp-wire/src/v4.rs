//! DHCPv4 message model and binary codec.
//!
//! The fixed BOOTP header is followed by the magic cookie and a list of
//! `code(1) length(1) data` options terminated by END.

use crate::error::{DecodeError, EncodeError};
use crate::types::v4::{
    option_code, rai_suboption, HEADER_LEN, HTYPE_ETHERNET, MAGIC_COOKIE, OP_BOOTREPLY,
    OP_BOOTREQUEST,
};
use crate::wire::{hex, put_option8, Reader};
use std::fmt;
use std::net::Ipv4Addr;

const SNAME_LEN: usize = 64;
const FILE_LEN: usize = 128;

/// BOOTP op code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// BOOTREQUEST (client → server).
    BootRequest,
    /// BOOTREPLY (server → client).
    BootReply,
    /// Any other value.
    Other(u8),
}

impl From<u8> for OpCode {
    fn from(v: u8) -> Self {
        match v {
            OP_BOOTREQUEST => Self::BootRequest,
            OP_BOOTREPLY => Self::BootReply,
            other => Self::Other(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::BootRequest => OP_BOOTREQUEST,
            OpCode::BootReply => OP_BOOTREPLY,
            OpCode::Other(v) => v,
        }
    }
}

/// DHCPv4 message types (option 53).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// DHCPDISCOVER (1).
    Discover,
    /// DHCPOFFER (2).
    Offer,
    /// DHCPREQUEST (3).
    Request,
    /// DHCPDECLINE (4).
    Decline,
    /// DHCPACK (5).
    Ack,
    /// DHCPNAK (6).
    Nak,
    /// DHCPRELEASE (7).
    Release,
    /// DHCPINFORM (8).
    Inform,
    /// Any other value.
    Other(u8),
}

impl From<u8> for MessageType {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::Discover,
            2 => Self::Offer,
            3 => Self::Request,
            4 => Self::Decline,
            5 => Self::Ack,
            6 => Self::Nak,
            7 => Self::Release,
            8 => Self::Inform,
            other => Self::Other(other),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(t: MessageType) -> Self {
        match t {
            MessageType::Discover => 1,
            MessageType::Offer => 2,
            MessageType::Request => 3,
            MessageType::Decline => 4,
            MessageType::Ack => 5,
            MessageType::Nak => 6,
            MessageType::Release => 7,
            MessageType::Inform => 8,
            MessageType::Other(v) => v,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discover => "DISCOVER",
            Self::Offer => "OFFER",
            Self::Request => "REQUEST",
            Self::Decline => "DECLINE",
            Self::Ack => "ACK",
            Self::Nak => "NAK",
            Self::Release => "RELEASE",
            Self::Inform => "INFORM",
            Self::Other(v) => return write!(f, "unknown ({v})"),
        };
        f.write_str(name)
    }
}

/// A raw DHCPv4 option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOption {
    /// Option code.
    pub code: u8,
    /// Option data.
    pub data: Vec<u8>,
}

/// Relay Agent Information (option 82) and its sub-options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayAgentInfo {
    suboptions: Vec<RawOption>,
}

impl RelayAgentInfo {
    /// An empty container.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            suboptions: Vec::new(),
        }
    }

    /// Builder-style sub-option append.
    #[must_use]
    pub fn with(mut self, code: u8, data: &[u8]) -> Self {
        self.suboptions.push(RawOption {
            code,
            data: data.to_vec(),
        });
        self
    }

    /// Data of the first sub-option with the given code.
    #[must_use]
    pub fn get(&self, code: u8) -> Option<&[u8]> {
        self.suboptions
            .iter()
            .find(|o| o.code == code)
            .map(|o| o.data.as_slice())
    }

    /// Agent Circuit ID sub-option.
    #[must_use]
    pub fn circuit_id(&self) -> Option<&[u8]> {
        self.get(rai_suboption::CIRCUIT_ID)
    }

    /// Agent Remote ID sub-option.
    #[must_use]
    pub fn remote_id(&self) -> Option<&[u8]> {
        self.get(rai_suboption::REMOTE_ID)
    }

    /// Link Selection sub-option, when present and exactly four bytes.
    #[must_use]
    pub fn link_selection(&self) -> Option<Ipv4Addr> {
        let data = self.get(rai_suboption::LINK_SELECTION)?;
        <[u8; 4]>::try_from(data).ok().map(Ipv4Addr::from)
    }

    /// Parses the payload of option 82.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OptionTruncated`] if a sub-option overruns
    /// the payload.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        let mut suboptions = Vec::new();
        while !r.is_empty() {
            let code = r.u8()?;
            let declared = usize::from(r.u8()?);
            if r.remaining() < declared {
                return Err(DecodeError::OptionTruncated {
                    code: u16::from(code),
                    declared,
                    available: r.remaining(),
                });
            }
            suboptions.push(RawOption {
                code,
                data: r.take(declared)?.to_vec(),
            });
        }
        Ok(Self { suboptions })
    }

    /// Serializes the sub-options into an option 82 payload.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if a sub-option exceeds 255 bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodeError> {
        let mut v = Vec::new();
        for sub in &self.suboptions {
            put_option8(&mut v, sub.code, &sub.data)?;
        }
        Ok(v)
    }
}

/// Colon-separated hardware address rendering.
#[derive(Debug, Clone, Copy)]
pub struct HwAddr<'a>(pub &'a [u8]);

impl fmt::Display for HwAddr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// A DHCPv4 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dhcp4 {
    /// BOOTREQUEST or BOOTREPLY.
    pub op: OpCode,
    /// Hardware address type.
    pub htype: u8,
    /// Hardware address length.
    pub hlen: u8,
    /// Relay hop count.
    pub hops: u8,
    /// Transaction id.
    pub xid: u32,
    /// Seconds since the client began acquisition.
    pub secs: u16,
    /// Flags (broadcast bit).
    pub flags: u16,
    /// Client IP address.
    pub ciaddr: Ipv4Addr,
    /// "Your" (assigned) IP address.
    pub yiaddr: Ipv4Addr,
    /// Next server IP address.
    pub siaddr: Ipv4Addr,
    /// Relay agent (gateway) IP address.
    pub giaddr: Ipv4Addr,
    /// Client hardware address, zero padded.
    pub chaddr: [u8; 16],
    /// Server host name field, verbatim.
    pub sname: Vec<u8>,
    /// Boot file name field, verbatim.
    pub file: Vec<u8>,
    /// Options in wire order (PAD and END are not kept).
    pub options: Vec<RawOption>,
}

impl Dhcp4 {
    /// A BOOTREQUEST of the given type from an Ethernet client.
    #[must_use]
    pub fn request(msg_type: MessageType, xid: u32, mac: [u8; 6]) -> Self {
        let mut chaddr = [0u8; 16];
        chaddr[..6].copy_from_slice(&mac);
        let mut msg = Self {
            op: OpCode::BootRequest,
            htype: HTYPE_ETHERNET,
            hlen: 6,
            hops: 0,
            xid,
            secs: 0,
            flags: 0,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: Ipv4Addr::UNSPECIFIED,
            siaddr: Ipv4Addr::UNSPECIFIED,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr,
            sname: Vec::new(),
            file: Vec::new(),
            options: Vec::new(),
        };
        msg.set_option(option_code::MESSAGE_TYPE, vec![u8::from(msg_type)]);
        msg
    }

    /// A BOOTREPLY answering `req` with the given type.
    #[must_use]
    pub fn reply_to(req: &Self, msg_type: MessageType) -> Self {
        let mut msg = Self {
            op: OpCode::BootReply,
            options: Vec::new(),
            ..req.clone()
        };
        msg.set_option(option_code::MESSAGE_TYPE, vec![u8::from(msg_type)]);
        msg
    }

    /// Data of the first option with the given code.
    #[must_use]
    pub fn option(&self, code: u8) -> Option<&[u8]> {
        self.options
            .iter()
            .find(|o| o.code == code)
            .map(|o| o.data.as_slice())
    }

    /// Replace (or add) an option.
    pub fn set_option(&mut self, code: u8, data: Vec<u8>) {
        match self.options.iter_mut().find(|o| o.code == code) {
            Some(existing) => existing.data = data,
            None => self.options.push(RawOption { code, data }),
        }
    }

    /// DHCP message type (option 53), if present.
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        match self.option(option_code::MESSAGE_TYPE)? {
            [t] => Some(MessageType::from(*t)),
            _ => None,
        }
    }

    /// Relay Agent Information (option 82).
    ///
    /// A malformed option 82 is reported as absent.
    #[must_use]
    pub fn relay_agent_info(&self) -> Option<RelayAgentInfo> {
        self.option(option_code::RELAY_AGENT_INFO)
            .and_then(|data| RelayAgentInfo::parse(data).ok())
    }

    /// Attach Relay Agent Information.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if a sub-option exceeds 255 bytes.
    pub fn set_relay_agent_info(&mut self, rai: &RelayAgentInfo) -> Result<(), EncodeError> {
        self.set_option(option_code::RELAY_AGENT_INFO, rai.serialize()?);
        Ok(())
    }

    /// Client hardware address, trimmed to `hlen`.
    #[must_use]
    pub fn client_hw_addr(&self) -> HwAddr<'_> {
        let len = usize::from(self.hlen).min(self.chaddr.len());
        HwAddr(&self.chaddr[..len])
    }

    /// `true` when giaddr is set.
    #[must_use]
    pub fn has_gateway(&self) -> bool {
        !self.giaddr.is_unspecified()
    }

    /// `true` when yiaddr is set.
    #[must_use]
    pub fn has_your_ip(&self) -> bool {
        !self.yiaddr.is_unspecified()
    }

    /// Parses a DHCPv4 message.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the header is short, the magic cookie is
    /// wrong, or an option overruns the buffer.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }
        if data.len() < HEADER_LEN + MAGIC_COOKIE.len() {
            return Err(DecodeError::TooShort {
                expected: HEADER_LEN + MAGIC_COOKIE.len(),
                actual: data.len(),
            });
        }
        let mut r = Reader::new(data);
        let op = OpCode::from(r.u8()?);
        let htype = r.u8()?;
        let hlen = r.u8()?;
        let hops = r.u8()?;
        let xid = r.u32()?;
        let secs = r.u16()?;
        let flags = r.u16()?;
        let ciaddr = r.ipv4()?;
        let yiaddr = r.ipv4()?;
        let siaddr = r.ipv4()?;
        let giaddr = r.ipv4()?;
        let chaddr = r.array::<16>()?;
        let sname = r.take(SNAME_LEN)?.to_vec();
        let file = r.take(FILE_LEN)?.to_vec();
        if r.array::<4>()? != MAGIC_COOKIE {
            return Err(DecodeError::BadMagicCookie);
        }

        let mut options = Vec::new();
        while !r.is_empty() {
            let code = r.u8()?;
            match code {
                option_code::PAD => continue,
                option_code::END => break,
                _ => {}
            }
            let declared = usize::from(r.u8()?);
            if r.remaining() < declared {
                return Err(DecodeError::OptionTruncated {
                    code: u16::from(code),
                    declared,
                    available: r.remaining(),
                });
            }
            options.push(RawOption {
                code,
                data: r.take(declared)?.to_vec(),
            });
        }

        Ok(Self {
            op,
            htype,
            hlen,
            hops,
            xid,
            secs,
            flags,
            ciaddr,
            yiaddr,
            siaddr,
            giaddr,
            chaddr,
            sname,
            file,
            options,
        })
    }

    /// Serializes this message, terminating options with END.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if an option exceeds 255 bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, EncodeError> {
        let mut v = Vec::with_capacity(HEADER_LEN + 64);
        v.push(u8::from(self.op));
        v.push(self.htype);
        v.push(self.hlen);
        v.push(self.hops);
        v.extend_from_slice(&self.xid.to_be_bytes());
        v.extend_from_slice(&self.secs.to_be_bytes());
        v.extend_from_slice(&self.flags.to_be_bytes());
        for addr in [self.ciaddr, self.yiaddr, self.siaddr, self.giaddr] {
            v.extend_from_slice(&addr.octets());
        }
        v.extend_from_slice(&self.chaddr);
        put_fixed(&mut v, &self.sname, SNAME_LEN);
        put_fixed(&mut v, &self.file, FILE_LEN);
        v.extend_from_slice(&MAGIC_COOKIE);
        for option in &self.options {
            put_option8(&mut v, option.code, &option.data)?;
        }
        v.push(option_code::END);
        Ok(v)
    }
}

fn put_fixed(out: &mut Vec<u8>, data: &[u8], len: usize) {
    let n = data.len().min(len);
    out.extend_from_slice(&data[..n]);
    out.resize(out.len() + (len - n), 0);
}

impl fmt::Display for Dhcp4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message_type() {
            Some(t) => write!(f, "{t}")?,
            None => write!(f, "{:?}", self.op)?,
        }
        write!(
            f,
            " xid=0x{:08x} chaddr={} ciaddr={} yiaddr={} giaddr={} options=[",
            self.xid,
            self.client_hw_addr(),
            self.ciaddr,
            self.yiaddr,
            self.giaddr
        )?;
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}({})", option.code, hex(&option.data))?;
        }
        f.write_str("]")
    }
}
