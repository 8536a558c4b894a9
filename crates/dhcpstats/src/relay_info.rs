use dhcp_wire::{Dhcp4, RelayAgentInfo};
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

/// Interface label used when the relay names neither a circuit nor a
/// remote id.
pub const UNSPECIFIED_INTERFACE: &str = "unspecified";

/// A piece of relay metadata a relayed request lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MissingField {
    /// Relay Agent Information present but giaddr unset.
    GatewayIpAddr,
    /// giaddr set but no Relay Agent Information.
    RelayAgentInfo,
    /// No usable Link Selection sub-option.
    LinkSelection,
    /// Neither a circuit id nor a remote id.
    InterfaceId,
}

impl MissingField {
    /// Metric label for this field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GatewayIpAddr => "GatewayIPAddr",
            Self::RelayAgentInfo => "RelayAgentInfo",
            Self::LinkSelection => "LinkSelectionSubOption",
            Self::InterfaceId => "AgentIDSubOption",
        }
    }
}

/// Metadata extracted from a Relay Agent Information option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMetadata {
    /// Link Selection address, if present and well formed.
    pub link_selector: Option<Ipv4Addr>,
    /// Circuit id, else remote id, else [`UNSPECIFIED_INTERFACE`].
    pub interface_label: String,
    /// Sub-options the relay did not supply.
    pub missing: BTreeSet<MissingField>,
}

/// Reads link selection and interface identity out of `rai`.
///
/// # Examples
///
/// ```
/// use dhcp_wire::types::v4::rai_suboption;
/// use dhcp_wire::RelayAgentInfo;
/// use dhcpstats::relay_info::{extract, MissingField};
///
/// let rai = RelayAgentInfo::new().with(rai_suboption::REMOTE_ID, b"eth0");
/// let meta = extract(&rai);
/// assert_eq!(meta.interface_label, "eth0");
/// assert!(meta.missing.contains(&MissingField::LinkSelection));
/// ```
#[must_use]
pub fn extract(rai: &RelayAgentInfo) -> RelayMetadata {
    let mut missing = BTreeSet::new();

    let link_selector = rai.link_selection();
    if link_selector.is_none() {
        missing.insert(MissingField::LinkSelection);
    }

    let interface = [rai.circuit_id(), rai.remote_id()]
        .into_iter()
        .flatten()
        .find(|id| !id.is_empty());
    let interface_label = match interface {
        Some(id) => String::from_utf8_lossy(id).into_owned(),
        None => {
            missing.insert(MissingField::InterfaceId);
            UNSPECIFIED_INTERFACE.to_string()
        }
    };

    RelayMetadata {
        link_selector,
        interface_label,
        missing,
    }
}

/// How a DHCPv4 request reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOrigin {
    /// Straight from the client.
    Direct,
    /// Through a relay that set giaddr and Relay Agent Information.
    Relayed(RelayMetadata),
    /// Relay Agent Information present, giaddr unset.
    WithoutGateway,
    /// giaddr set, no Relay Agent Information.
    WithoutAgentInfo,
}

impl RelayOrigin {
    /// Classifies a request by its giaddr and option 82.
    #[must_use]
    pub fn of(req: &Dhcp4) -> Self {
        match (req.relay_agent_info(), req.has_gateway()) {
            (Some(rai), true) => Self::Relayed(extract(&rai)),
            (Some(_), false) => Self::WithoutGateway,
            (None, true) => Self::WithoutAgentInfo,
            (None, false) => Self::Direct,
        }
    }

    /// `true` unless the request came straight from the client.
    #[must_use]
    pub const fn is_relayed(&self) -> bool {
        !matches!(self, Self::Direct)
    }

    /// Relay metadata the request lacks, in label order.
    #[must_use]
    pub fn missing(&self) -> Vec<MissingField> {
        match self {
            Self::Direct => Vec::new(),
            Self::Relayed(meta) => meta.missing.iter().copied().collect(),
            Self::WithoutGateway => vec![MissingField::GatewayIpAddr],
            Self::WithoutAgentInfo => vec![MissingField::RelayAgentInfo],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhcp_wire::types::v4::rai_suboption;
    use dhcp_wire::v4::MessageType;

    #[test]
    fn circuit_id_wins_over_remote_id() {
        let rai = RelayAgentInfo::new()
            .with(rai_suboption::CIRCUIT_ID, b"Eth1/1")
            .with(rai_suboption::REMOTE_ID, b"eth0")
            .with(rai_suboption::LINK_SELECTION, &[10, 0, 0, 1]);
        let meta = extract(&rai);
        assert_eq!(meta.interface_label, "Eth1/1");
        assert_eq!(meta.link_selector, Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(meta.missing.is_empty());
    }

    #[test]
    fn empty_circuit_falls_back_to_remote() {
        let rai = RelayAgentInfo::new()
            .with(rai_suboption::CIRCUIT_ID, b"")
            .with(rai_suboption::REMOTE_ID, b"eth0");
        let meta = extract(&rai);
        assert_eq!(meta.interface_label, "eth0");
        assert!(!meta.missing.contains(&MissingField::InterfaceId));
    }

    #[test]
    fn no_ids_is_unspecified() {
        let rai = RelayAgentInfo::new()
            .with(rai_suboption::CIRCUIT_ID, b"")
            .with(rai_suboption::REMOTE_ID, b"");
        let meta = extract(&rai);
        assert_eq!(meta.interface_label, UNSPECIFIED_INTERFACE);
        assert!(meta.missing.contains(&MissingField::InterfaceId));
        assert!(meta.missing.contains(&MissingField::LinkSelection));
    }

    #[test]
    fn short_link_selection_is_missing() {
        let rai = RelayAgentInfo::new().with(rai_suboption::LINK_SELECTION, &[10, 0, 0]);
        let meta = extract(&rai);
        assert_eq!(meta.link_selector, None);
        assert!(meta.missing.contains(&MissingField::LinkSelection));
    }

    #[test]
    fn extraction_is_repeatable() {
        let rai = RelayAgentInfo::new().with(rai_suboption::CIRCUIT_ID, b"port7");
        let before = rai.clone();
        assert_eq!(extract(&rai), extract(&rai));
        assert_eq!(rai, before);
    }

    #[test]
    fn labels_match_exported_names() {
        assert_eq!(MissingField::GatewayIpAddr.label(), "GatewayIPAddr");
        assert_eq!(MissingField::RelayAgentInfo.label(), "RelayAgentInfo");
        assert_eq!(MissingField::LinkSelection.label(), "LinkSelectionSubOption");
        assert_eq!(MissingField::InterfaceId.label(), "AgentIDSubOption");
    }

    fn discover() -> Dhcp4 {
        Dhcp4::request(MessageType::Discover, 1, [0, 0x11, 0x22, 0x33, 0x44, 0x55])
    }

    #[test]
    fn origin_covers_every_combination() {
        let rai = RelayAgentInfo::new().with(rai_suboption::CIRCUIT_ID, b"c1");

        let direct = discover();
        assert_eq!(RelayOrigin::of(&direct), RelayOrigin::Direct);
        assert!(RelayOrigin::of(&direct).missing().is_empty());

        let mut no_gw = discover();
        no_gw.set_relay_agent_info(&rai).unwrap();
        let origin = RelayOrigin::of(&no_gw);
        assert!(origin.is_relayed());
        assert_eq!(origin.missing(), vec![MissingField::GatewayIpAddr]);

        let mut no_rai = discover();
        no_rai.giaddr = Ipv4Addr::new(10, 99, 99, 1);
        let origin = RelayOrigin::of(&no_rai);
        assert!(origin.is_relayed());
        assert_eq!(origin.missing(), vec![MissingField::RelayAgentInfo]);

        let mut relayed = no_rai.clone();
        relayed.set_relay_agent_info(&rai).unwrap();
        let origin = RelayOrigin::of(&relayed);
        assert!(matches!(origin, RelayOrigin::Relayed(_)));
        assert_eq!(origin.missing(), vec![MissingField::LinkSelection]);
    }
}
