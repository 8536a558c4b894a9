//! Decode and encode failures for DHCP wire messages.

use thiserror::Error;

/// Errors that can occur while parsing a DHCP message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input byte slice was empty.
    #[error("message is empty")]
    Empty,
    /// The input ended before a fixed-size field was complete.
    #[error("message too short: expected {expected} bytes, got {actual}")]
    TooShort {
        /// Minimum expected byte count.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },
    /// An option declared more data than the buffer holds.
    #[error("option {code} truncated: declared {declared} bytes, {available} available")]
    OptionTruncated {
        /// Option code.
        code: u16,
        /// Declared option length.
        declared: usize,
        /// Bytes left in the buffer.
        available: usize,
    },
    /// The DHCPv4 magic cookie was missing or wrong.
    #[error("bad magic cookie")]
    BadMagicCookie,
    /// Encapsulated options nested beyond the supported depth.
    #[error("options nested deeper than {max} levels")]
    NestingTooDeep {
        /// Maximum nesting depth.
        max: usize,
    },
    /// A relay envelope carries no Relay Message option.
    #[error("relay envelope has no relay message option")]
    MissingRelayMessage,
    /// The message inside a relay envelope failed to decode.
    #[error("malformed relay envelope: {0}")]
    MalformedEnvelope(Box<DecodeError>),
    /// Relay envelopes nested beyond the configured bound.
    #[error("relay envelopes nested deeper than {max}")]
    RelayTooDeep {
        /// Configured maximum depth.
        max: usize,
    },
}

impl DecodeError {
    /// Stable, low-cardinality label for this failure.
    ///
    /// Every failure to open a relay envelope reports `malformed-envelope`,
    /// whether the inner bytes were corrupt or the nesting ran too deep.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingRelayMessage | Self::MalformedEnvelope(_) | Self::RelayTooDeep { .. } => {
                "malformed-envelope"
            }
            Self::NestingTooDeep { .. } => "nesting-too-deep",
            Self::Empty
            | Self::TooShort { .. }
            | Self::OptionTruncated { .. }
            | Self::BadMagicCookie => "malformed-message",
        }
    }
}

/// Errors that can occur while serializing a DHCP message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Option data does not fit in the option length field.
    #[error("option {code} too long: {len} bytes exceeds {max}")]
    OptionTooLong {
        /// Option code.
        code: u16,
        /// Encoded data length.
        len: usize,
        /// Largest length the field can carry.
        max: usize,
    },
}
