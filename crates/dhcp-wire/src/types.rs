//! Protocol constants for DHCPv4 (RFC 2131/2132/3046/3527) and DHCPv6 (RFC 8415).

/// Largest hop count a DHCPv6 relay will forward (RFC 8415 `HOP_COUNT_LIMIT`).
pub const HOP_COUNT_LIMIT: u8 = 8;

/// UDP ports used by both protocol families.
pub mod port {
    /// DHCPv4 server port.
    pub const V4_SERVER: u16 = 67;
    /// DHCPv4 client port.
    pub const V4_CLIENT: u16 = 68;
    /// DHCPv6 client port.
    pub const V6_CLIENT: u16 = 546;
    /// DHCPv6 server and relay port.
    pub const V6_SERVER: u16 = 547;
}

/// DHCPv6 option codes understood by the codec.
pub mod option_code {
    /// Client Identifier.
    pub const CLIENT_ID: u16 = 1;
    /// Server Identifier.
    pub const SERVER_ID: u16 = 2;
    /// Identity Association for Non-temporary Addresses.
    pub const IA_NA: u16 = 3;
    /// Identity Association for Temporary Addresses.
    pub const IA_TA: u16 = 4;
    /// IA Address.
    pub const IA_ADDR: u16 = 5;
    /// Relay Message.
    pub const RELAY_MSG: u16 = 9;
    /// Status Code.
    pub const STATUS_CODE: u16 = 13;
    /// Interface-Id.
    pub const INTERFACE_ID: u16 = 18;
    /// Identity Association for Prefix Delegation.
    pub const IA_PD: u16 = 25;
    /// IA Prefix.
    pub const IA_PREFIX: u16 = 26;
}

/// DHCPv6 status codes.
pub mod status_code {
    /// Success.
    pub const SUCCESS: u16 = 0;
    /// Failure, reason unspecified.
    pub const UNSPEC_FAIL: u16 = 1;
    /// Server has no addresses available to assign to the IA(s).
    pub const NO_ADDRS_AVAIL: u16 = 2;
    /// Client record (binding) unavailable.
    pub const NO_BINDING: u16 = 3;
    /// The prefix for the address is not appropriate for the link.
    pub const NOT_ON_LINK: u16 = 4;
    /// Server forces the client to use multicast.
    pub const USE_MULTICAST: u16 = 5;
    /// Delegating router has no prefixes available.
    pub const NO_PREFIX_AVAIL: u16 = 6;

    /// Human-readable name for a status code.
    #[must_use]
    pub const fn name(code: u16) -> &'static str {
        match code {
            SUCCESS => "Success",
            UNSPEC_FAIL => "UnspecFail",
            NO_ADDRS_AVAIL => "NoAddrsAvail",
            NO_BINDING => "NoBinding",
            NOT_ON_LINK => "NotOnLink",
            USE_MULTICAST => "UseMulticast",
            NO_PREFIX_AVAIL => "NoPrefixAvail",
            _ => "Unknown",
        }
    }
}

/// DHCPv4 constants.
pub mod v4 {
    /// Magic cookie that precedes the DHCPv4 options field.
    pub const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
    /// Length of the fixed BOOTP header.
    pub const HEADER_LEN: usize = 236;
    /// BOOTREQUEST op code.
    pub const OP_BOOTREQUEST: u8 = 1;
    /// BOOTREPLY op code.
    pub const OP_BOOTREPLY: u8 = 2;
    /// Ethernet hardware type.
    pub const HTYPE_ETHERNET: u8 = 1;

    /// DHCPv4 option codes.
    pub mod option_code {
        /// Pad.
        pub const PAD: u8 = 0;
        /// Requested IP Address.
        pub const REQUESTED_IP: u8 = 50;
        /// DHCP Message Type.
        pub const MESSAGE_TYPE: u8 = 53;
        /// Server Identifier.
        pub const SERVER_ID: u8 = 54;
        /// Relay Agent Information.
        pub const RELAY_AGENT_INFO: u8 = 82;
        /// End.
        pub const END: u8 = 255;
    }

    /// Relay Agent Information sub-option codes.
    pub mod rai_suboption {
        /// Agent Circuit ID.
        pub const CIRCUIT_ID: u8 = 1;
        /// Agent Remote ID.
        pub const REMOTE_ID: u8 = 2;
        /// Link Selection (RFC 3527).
        pub const LINK_SELECTION: u8 = 5;
    }
}
