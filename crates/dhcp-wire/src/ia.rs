//! Identity associations (IA_NA, IA_TA, IA_PD) and the resources they carry.

use crate::error::{DecodeError, EncodeError};
use crate::types::{option_code, status_code};
use crate::v6::{DhcpOption, Options, StatusCode};
use crate::wire::{hex, Reader};
use std::fmt;
use std::net::Ipv6Addr;

/// The three kinds of identity association.
///
/// The set is fixed by the protocol, so behavior that differs per kind is
/// dispatched on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IaKind {
    /// Non-temporary addresses.
    Na,
    /// Temporary addresses.
    Ta,
    /// Delegated prefixes.
    Pd,
}

impl IaKind {
    /// All kinds, in metric reporting order.
    pub const ALL: [Self; 3] = [Self::Na, Self::Ta, Self::Pd];

    /// DHCPv6 option code carrying this kind.
    #[must_use]
    pub const fn option_code(self) -> u16 {
        match self {
            Self::Na => option_code::IA_NA,
            Self::Ta => option_code::IA_TA,
            Self::Pd => option_code::IA_PD,
        }
    }

    /// Map an option code back to its kind.
    #[must_use]
    pub const fn from_option_code(code: u16) -> Option<Self> {
        match code {
            option_code::IA_NA => Some(Self::Na),
            option_code::IA_TA => Some(Self::Ta),
            option_code::IA_PD => Some(Self::Pd),
            _ => None,
        }
    }

    /// Label used in logs and metrics (`IA_NA`, `IA_TA`, `IA_PD`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Na => "IA_NA",
            Self::Ta => "IA_TA",
            Self::Pd => "IA_PD",
        }
    }

    /// Status code a server reports when it cannot satisfy this kind.
    #[must_use]
    pub const fn unavailable_status(self) -> u16 {
        match self {
            Self::Na | Self::Ta => status_code::NO_ADDRS_AVAIL,
            Self::Pd => status_code::NO_PREFIX_AVAIL,
        }
    }

    const fn has_timers(self) -> bool {
        !matches!(self, Self::Ta)
    }
}

impl fmt::Display for IaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single identity association option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssociation {
    /// Which kind of IA this is.
    pub kind: IaKind,
    /// Client-chosen identifier, unique per kind within a message.
    pub iaid: [u8; 4],
    /// Renewal time. Not carried on the wire for IA_TA.
    pub t1: u32,
    /// Rebinding time. Not carried on the wire for IA_TA.
    pub t2: u32,
    /// Encapsulated options (addresses, prefixes, status).
    pub options: Options,
}

impl IdentityAssociation {
    /// An empty IA of the given kind.
    #[must_use]
    pub const fn new(kind: IaKind, iaid: [u8; 4]) -> Self {
        Self {
            kind,
            iaid,
            t1: 0,
            t2: 0,
            options: Options::new(),
        }
    }

    /// An IA that explicitly refuses the request: no resources and a
    /// status code appropriate to `kind`.
    #[must_use]
    pub fn denial(kind: IaKind, iaid: [u8; 4]) -> Self {
        let mut ia = Self::new(kind, iaid);
        ia.options.push(DhcpOption::StatusCode(StatusCode::new(
            kind.unavailable_status(),
            "",
        )));
        ia
    }

    /// Builder-style option append.
    #[must_use]
    pub fn with_option(mut self, option: DhcpOption) -> Self {
        self.options.push(option);
        self
    }

    /// `true` when the IA grants at least one resource: an address for
    /// IA_NA/IA_TA, a prefix for IA_PD.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        match self.kind {
            IaKind::Na | IaKind::Ta => self.options.addresses().next().is_some(),
            IaKind::Pd => self.options.prefixes().next().is_some(),
        }
    }

    /// The IA-level status code, if present.
    #[must_use]
    pub fn status(&self) -> Option<&StatusCode> {
        self.options.status_code()
    }

    pub(crate) fn decode(kind: IaKind, data: &[u8], depth: usize) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        let iaid = r.array::<4>()?;
        let (t1, t2) = if kind.has_timers() {
            (r.u32()?, r.u32()?)
        } else {
            (0, 0)
        };
        let options = Options::decode(r.rest(), depth + 1)?;
        Ok(Self {
            kind,
            iaid,
            t1,
            t2,
            options,
        })
    }

    pub(crate) fn encode_body(&self) -> Result<Vec<u8>, EncodeError> {
        let mut v = Vec::with_capacity(12);
        v.extend_from_slice(&self.iaid);
        if self.kind.has_timers() {
            v.extend_from_slice(&self.t1.to_be_bytes());
            v.extend_from_slice(&self.t2.to_be_bytes());
        }
        self.options.encode(&mut v)?;
        Ok(v)
    }
}

impl fmt::Display for IdentityAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{iaid={}", self.kind, hex(&self.iaid))?;
        if self.kind.has_timers() {
            write!(f, " t1={} t2={}", self.t1, self.t2)?;
        }
        write!(f, " options={}}}", self.options)
    }
}

/// IA Address option (code 5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IaAddress {
    /// Assigned address.
    pub address: Ipv6Addr,
    /// Preferred lifetime in seconds.
    pub preferred_lifetime: u32,
    /// Valid lifetime in seconds.
    pub valid_lifetime: u32,
    /// Encapsulated options.
    pub options: Options,
}

impl IaAddress {
    /// Creates an address with the given lifetimes and no options.
    #[must_use]
    pub const fn new(address: Ipv6Addr, preferred_lifetime: u32, valid_lifetime: u32) -> Self {
        Self {
            address,
            preferred_lifetime,
            valid_lifetime,
            options: Options::new(),
        }
    }

    pub(crate) fn decode(data: &[u8], depth: usize) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        Ok(Self {
            address: r.ipv6()?,
            preferred_lifetime: r.u32()?,
            valid_lifetime: r.u32()?,
            options: Options::decode(r.rest(), depth + 1)?,
        })
    }

    pub(crate) fn encode_body(&self) -> Result<Vec<u8>, EncodeError> {
        let mut v = Vec::with_capacity(24);
        v.extend_from_slice(&self.address.octets());
        v.extend_from_slice(&self.preferred_lifetime.to_be_bytes());
        v.extend_from_slice(&self.valid_lifetime.to_be_bytes());
        self.options.encode(&mut v)?;
        Ok(v)
    }
}

impl fmt::Display for IaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IAADDR{{{} preferred={} valid={}",
            self.address, self.preferred_lifetime, self.valid_lifetime
        )?;
        if !self.options.is_empty() {
            write!(f, " options={}", self.options)?;
        }
        f.write_str("}")
    }
}

/// IA Prefix option (code 26).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IaPrefix {
    /// Preferred lifetime in seconds.
    pub preferred_lifetime: u32,
    /// Valid lifetime in seconds.
    pub valid_lifetime: u32,
    /// Prefix length in bits.
    pub prefix_length: u8,
    /// Delegated prefix.
    pub prefix: Ipv6Addr,
    /// Encapsulated options.
    pub options: Options,
}

impl IaPrefix {
    /// Creates a prefix with the given lifetimes and no options.
    #[must_use]
    pub const fn new(
        prefix: Ipv6Addr,
        prefix_length: u8,
        preferred_lifetime: u32,
        valid_lifetime: u32,
    ) -> Self {
        Self {
            preferred_lifetime,
            valid_lifetime,
            prefix_length,
            prefix,
            options: Options::new(),
        }
    }

    pub(crate) fn decode(data: &[u8], depth: usize) -> Result<Self, DecodeError> {
        let mut r = Reader::new(data);
        Ok(Self {
            preferred_lifetime: r.u32()?,
            valid_lifetime: r.u32()?,
            prefix_length: r.u8()?,
            prefix: r.ipv6()?,
            options: Options::decode(r.rest(), depth + 1)?,
        })
    }

    pub(crate) fn encode_body(&self) -> Result<Vec<u8>, EncodeError> {
        let mut v = Vec::with_capacity(25);
        v.extend_from_slice(&self.preferred_lifetime.to_be_bytes());
        v.extend_from_slice(&self.valid_lifetime.to_be_bytes());
        v.push(self.prefix_length);
        v.extend_from_slice(&self.prefix.octets());
        self.options.encode(&mut v)?;
        Ok(v)
    }
}

impl fmt::Display for IaPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IAPREFIX{{{}/{} preferred={} valid={}}}",
            self.prefix, self.prefix_length, self.preferred_lifetime, self.valid_lifetime
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_carries_kind_specific_status() {
        let na = IdentityAssociation::denial(IaKind::Na, [1, 2, 3, 4]);
        assert_eq!(na.iaid, [1, 2, 3, 4]);
        assert!(!na.is_allocated());
        assert_eq!(na.status().map(|s| s.code), Some(status_code::NO_ADDRS_AVAIL));

        let ta = IdentityAssociation::denial(IaKind::Ta, [0; 4]);
        assert_eq!(ta.status().map(|s| s.code), Some(status_code::NO_ADDRS_AVAIL));

        let pd = IdentityAssociation::denial(IaKind::Pd, [9; 4]);
        assert_eq!(pd.status().map(|s| s.code), Some(status_code::NO_PREFIX_AVAIL));
    }

    #[test]
    fn allocation_depends_on_kind() {
        let addr = DhcpOption::IaAddress(IaAddress::new("2001:db8::1".parse().unwrap(), 10, 20));
        let prefix = DhcpOption::IaPrefix(IaPrefix::new("2001:db8:1::".parse().unwrap(), 56, 10, 20));

        assert!(IdentityAssociation::new(IaKind::Na, [0; 4])
            .with_option(addr.clone())
            .is_allocated());
        assert!(IdentityAssociation::new(IaKind::Ta, [0; 4])
            .with_option(addr.clone())
            .is_allocated());
        // an address does not satisfy a prefix delegation
        assert!(!IdentityAssociation::new(IaKind::Pd, [0; 4])
            .with_option(addr)
            .is_allocated());
        assert!(IdentityAssociation::new(IaKind::Pd, [0; 4])
            .with_option(prefix.clone())
            .is_allocated());
        assert!(!IdentityAssociation::new(IaKind::Na, [0; 4])
            .with_option(prefix)
            .is_allocated());
    }

    #[test]
    fn ia_ta_has_no_timers_on_the_wire() {
        let mut ia = IdentityAssociation::new(IaKind::Ta, [0xAA; 4]);
        ia.t1 = 100;
        let body = ia.encode_body().unwrap();
        assert_eq!(body, vec![0xAA; 4]);

        let decoded = IdentityAssociation::decode(IaKind::Ta, &body, 0).unwrap();
        assert_eq!(decoded.t1, 0);
        assert_eq!(decoded.iaid, [0xAA; 4]);
    }

    #[test]
    fn ia_na_too_short_is_error() {
        assert!(matches!(
            IdentityAssociation::decode(IaKind::Na, &[1, 2, 3, 4, 0, 0], 0),
            Err(DecodeError::TooShort { .. })
        ));
    }

    #[test]
    fn option_code_mapping_is_consistent() {
        for kind in IaKind::ALL {
            assert_eq!(IaKind::from_option_code(kind.option_code()), Some(kind));
        }
        assert_eq!(IaKind::from_option_code(option_code::IA_ADDR), None);
    }
}
