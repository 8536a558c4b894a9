mod common;

use common::*;
use dhcp_wire::v4::{MessageType as MessageType4, OpCode};
use dhcp_wire::v6::MessageType;
use dhcp_wire::types::v4::rai_suboption;
use dhcp_wire::{Dhcp4, IaKind, RelayAgentInfo};
use dhcpstats::{Counter, Plugin, RequestStats, StatsConfig};

fn plugin(sink: &std::sync::Arc<RecordingSink>) -> RequestStats {
    RequestStats::new(sink.clone(), config())
}

#[test]
fn direct_v6_request_counts_type_and_ias() {
    let sink = RecordingSink::new();
    let req = request6(vec![
        requested(IaKind::Na, 1),
        requested(IaKind::Na, 2),
        requested(IaKind::Pd, 3),
    ]);
    let resp = reply6(vec![]);

    let out = plugin(&sink).handle6(&req, resp.clone());

    assert_eq!(out.into_response(), Some(resp));
    assert_eq!(sink.total(Counter::V6Requests, &["REQUEST"]), 1);
    assert_eq!(sink.total(Counter::V6RequestedIas, &["IA_NA"]), 2);
    assert_eq!(sink.total(Counter::V6RequestedIas, &["IA_PD"]), 1);
    assert_eq!(sink.total(Counter::V6RequestedIas, &["IA_TA"]), 0);
    assert_eq!(sink.total_any(Counter::V6FromRelays), 0);
}

#[test]
fn relayed_v6_request_is_counted_by_inner_type() {
    let sink = RecordingSink::new();
    let req = relayed(request6(vec![requested(IaKind::Ta, 1)]), 3);

    let out = plugin(&sink).handle6(&req, reply6(vec![]));

    assert!(!out.is_drop());
    assert_eq!(sink.total_any(Counter::V6FromRelays), 1);
    assert_eq!(sink.total(Counter::V6Requests, &["REQUEST"]), 1);
    assert_eq!(sink.total(Counter::V6Requests, &["RELAY-FORW"]), 0);
    assert_eq!(sink.total(Counter::V6RequestedIas, &["IA_TA"]), 1);
}

#[test]
fn corrupt_envelope_is_dropped_and_still_counted_as_relayed() {
    let sink = RecordingSink::new();

    let out = plugin(&sink).handle6(&corrupt_relay(), reply6(vec![]));

    assert!(out.is_drop());
    assert_eq!(
        sink.take(),
        vec![
            dhcpstats::Increment::new(Counter::V6FromRelays),
            dhcpstats::Increment::new(Counter::V6Requests).label("error"),
        ]
    );
}

#[test]
fn relay_chain_past_configured_depth_is_dropped() {
    let sink = RecordingSink::new();
    let stats = RequestStats::new(
        sink.clone(),
        StatsConfig {
            max_relay_depth: 2,
            ..StatsConfig::default()
        },
    );

    assert!(!stats
        .handle6(&relayed(request6(vec![]), 2), reply6(vec![]))
        .is_drop());
    assert!(stats
        .handle6(&relayed(request6(vec![]), 3), reply6(vec![]))
        .is_drop());
    assert_eq!(sink.total(Counter::V6Requests, &["error"]), 1);
    assert_eq!(sink.total_any(Counter::V6FromRelays), 2);
}

#[test]
fn request_without_ias_has_no_ia_counter() {
    let sink = RecordingSink::new();
    let req = dhcp_wire::Dhcp6::Client(client_message(MessageType::InformationRequest, vec![]));

    plugin(&sink).handle6(&req, reply6(vec![]));

    assert_eq!(sink.total_any(Counter::V6RequestedIas), 0);
    assert_eq!(sink.total(Counter::V6Requests, &["INFORMATION-REQUEST"]), 1);
}

#[test]
fn v4_non_bootrequest_is_ignored_but_forwarded() {
    let sink = RecordingSink::new();
    let mut req = discover4();
    req.op = OpCode::BootReply;
    let resp = Dhcp4::reply_to(&req, MessageType4::Offer);

    let out = plugin(&sink).handle4(&req, resp.clone());

    assert_eq!(out.into_response(), Some(resp));
    assert_eq!(sink.take(), vec![dhcpstats::Increment::new(Counter::V4Requests).label("ignored")]);
}

#[test]
fn v4_direct_request_counts_type_only() {
    let sink = RecordingSink::new();
    let req = discover4();

    plugin(&sink).handle4(&req, Dhcp4::reply_to(&req, MessageType4::Offer));

    assert_eq!(
        sink.take(),
        vec![dhcpstats::Increment::new(Counter::V4Requests).label("DISCOVER")]
    );
}

#[test]
fn v4_rai_without_giaddr_reports_gateway_missing() {
    let sink = RecordingSink::new();
    let req = with_relay(discover4(), None, Some(&circuit_rai(b"Eth1/1")));

    plugin(&sink).handle4(&req, Dhcp4::reply_to(&req, MessageType4::Offer));

    assert_eq!(sink.total_any(Counter::V4FromRelays), 1);
    assert_eq!(
        sink.total(Counter::V4RaiMissingSuboptions, &["GatewayIPAddr"]),
        1
    );
    assert_eq!(sink.total_any(Counter::V4RaiMissingSuboptions), 1);
}

#[test]
fn v4_giaddr_without_rai_reports_rai_missing() {
    let sink = RecordingSink::new();
    let req = with_relay(discover4(), Some(GIADDR), None);

    plugin(&sink).handle4(&req, Dhcp4::reply_to(&req, MessageType4::Offer));

    assert_eq!(sink.total_any(Counter::V4FromRelays), 1);
    assert_eq!(
        sink.total(Counter::V4RaiMissingSuboptions, &["RelayAgentInfo"]),
        1
    );
    assert_eq!(sink.total_any(Counter::V4RaiMissingSuboptions), 1);
}

#[test]
fn v4_fully_relayed_reports_missing_suboptions() {
    let sink = RecordingSink::new();
    let rai = RelayAgentInfo::new().with(rai_suboption::CIRCUIT_ID, b"");
    let req = with_relay(discover4(), Some(GIADDR), Some(&rai));

    plugin(&sink).handle4(&req, Dhcp4::reply_to(&req, MessageType4::Offer));

    assert_eq!(sink.total(Counter::V4Requests, &["DISCOVER"]), 1);
    assert_eq!(sink.total_any(Counter::V4FromRelays), 1);
    assert_eq!(
        sink.total(Counter::V4RaiMissingSuboptions, &["LinkSelectionSubOption"]),
        1
    );
    assert_eq!(
        sink.total(Counter::V4RaiMissingSuboptions, &["AgentIDSubOption"]),
        1
    );
}

#[test]
fn v4_complete_relay_info_reports_nothing_missing() {
    let sink = RecordingSink::new();
    let rai = RelayAgentInfo::new()
        .with(rai_suboption::CIRCUIT_ID, b"router1:Eth12/1")
        .with(rai_suboption::LINK_SELECTION, &[10, 20, 0, 1]);
    let req = with_relay(discover4(), Some(GIADDR), Some(&rai));

    plugin(&sink).handle4(&req, Dhcp4::reply_to(&req, MessageType4::Offer));

    assert_eq!(sink.total_any(Counter::V4FromRelays), 1);
    assert_eq!(sink.total_any(Counter::V4RaiMissingSuboptions), 0);
}
