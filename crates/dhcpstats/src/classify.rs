use crate::metrics::{Counter, Increment};
use crate::reconcile::Quantifier;
use crate::relay_info::RelayOrigin;
use crate::view::MessageView;
use dhcp_wire::v4::MessageType as MessageType4;
use dhcp_wire::v6::MessageType;
use dhcp_wire::IaKind;

/// Type label for exchanges that could not be processed.
pub const ERROR_LABEL: &str = "error";

/// Type label for DHCPv4 packets that are not BOOTREQUESTs.
pub const IGNORED_LABEL: &str = "ignored";

/// Type label for DHCPv4 packets without a message type option.
pub const UNKNOWN_TYPE_LABEL: &str = "unknown";

/// Which half of an exchange a counter describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The inbound request.
    Request,
    /// The outbound response.
    Response,
}

/// Reconciliation outcome for one IA kind of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IaOutcome {
    /// IA kind.
    pub kind: IaKind,
    /// Aggregate satisfaction for that kind.
    pub quantifier: Quantifier,
}

fn type_label4(msg_type: Option<MessageType4>) -> String {
    msg_type.map_or_else(|| UNKNOWN_TYPE_LABEL.to_string(), |t| t.to_string())
}

/// Increments for a DHCPv6 request, seen through its innermost message.
///
/// IA kinds the request does not carry produce no increment.
#[must_use]
pub fn request6(view: &MessageView<'_>) -> Vec<Increment> {
    let mut out = Vec::new();
    if view.is_relayed() {
        out.push(Increment::new(Counter::V6FromRelays));
    }
    out.push(Increment::new(Counter::V6Requests).label(view.kind().to_string()));
    for kind in IaKind::ALL {
        let count = view.reservation_count(kind);
        if count > 0 {
            out.push(
                Increment::new(Counter::V6RequestedIas)
                    .label(kind.label())
                    .by(count as u64),
            );
        }
    }
    out
}

/// Increments for a DHCPv6 response.
#[must_use]
pub fn response6(msg_type: MessageType, to_relay: bool, outcomes: &[IaOutcome]) -> Vec<Increment> {
    let mut out = Vec::new();
    if to_relay {
        out.push(Increment::new(Counter::V6ToRelays));
    }
    out.push(Increment::new(Counter::V6Responses).label(msg_type.to_string()));
    for outcome in outcomes {
        out.push(
            Increment::new(Counter::V6IasProcessed)
                .label(outcome.kind.label())
                .label(outcome.quantifier.as_str()),
        );
    }
    out
}

/// Increment for a DHCPv6 exchange that had to be dropped.
#[must_use]
pub fn error6(side: Side) -> Vec<Increment> {
    let counter = match side {
        Side::Request => Counter::V6Requests,
        Side::Response => Counter::V6Responses,
    };
    vec![Increment::new(counter).label(ERROR_LABEL)]
}

/// Increments for a DHCPv6 request whose relay envelopes could not be
/// removed. A relayed request still counts as received through a relay.
#[must_use]
pub fn undecodable_request6(relayed: bool) -> Vec<Increment> {
    let mut out = Vec::new();
    if relayed {
        out.push(Increment::new(Counter::V6FromRelays));
    }
    out.extend(error6(Side::Request));
    out
}

/// Increments for a DHCPv4 BOOTREQUEST.
#[must_use]
pub fn request4(msg_type: Option<MessageType4>, origin: &RelayOrigin) -> Vec<Increment> {
    let mut out = vec![Increment::new(Counter::V4Requests).label(type_label4(msg_type))];
    if origin.is_relayed() {
        out.push(Increment::new(Counter::V4FromRelays));
    }
    for field in origin.missing() {
        out.push(Increment::new(Counter::V4RaiMissingSuboptions).label(field.label()));
    }
    out
}

/// Increment for a DHCPv4 packet that is not a BOOTREQUEST.
#[must_use]
pub fn ignored4() -> Vec<Increment> {
    vec![Increment::new(Counter::V4Requests).label(IGNORED_LABEL)]
}

/// Increments for a DHCPv4 response.
#[must_use]
pub fn response4(msg_type: Option<MessageType4>, has_your_ip: bool, to_relay: bool) -> Vec<Increment> {
    let mut out = Vec::new();
    match msg_type {
        Some(MessageType4::Ack) if has_your_ip => out.push(
            Increment::new(Counter::V4LeasesProcessed).label(Quantifier::All.as_str()),
        ),
        Some(MessageType4::Nak) => out.push(
            Increment::new(Counter::V4LeasesProcessed).label(Quantifier::None.as_str()),
        ),
        _ => {}
    }
    out.push(Increment::new(Counter::V4Responses).label(type_label4(msg_type)));
    if to_relay {
        out.push(Increment::new(Counter::V4ToRelays));
    }
    out
}
