use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use dhcpstats::metrics::router;
use dhcpstats::{Counter, Increment, MetricsSink, PrometheusSink};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn only_metrics_is_routed() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let app = router(handle);

    for uri in ["/health", "/ready"] {
        let (status, _) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn metrics_renders_recorded_counters() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    metrics::with_local_recorder(&recorder, || {
        dhcpstats::metrics::describe();
        PrometheusSink.record(&Increment::new(Counter::V6Requests).label("SOLICIT").by(2));
        PrometheusSink.record(&Increment::new(Counter::V4FromRelays));
    });

    let (status, body) = get(router(handle), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"dhcpv6_requests_total{type="SOLICIT"} 2"#));
    assert!(body.contains("dhcpv4_from_relays_total 1"));
    assert!(body.contains("# HELP dhcpv6_requests_total DHCPv6 requests by message type"));
}

#[tokio::test]
async fn metrics_is_empty_before_any_exchange() {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let (status, body) = get(router(handle), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("dhcpv6_requests_total"));
}
