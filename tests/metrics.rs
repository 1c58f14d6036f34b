// tests/metrics.rs
//
// The Prometheus recorder is process-global, so the install, the round that
// records series, and the /metrics scrape all live in one test.

mod common;

use std::time::Duration;

use axum::body::{self, Body};
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use http::StatusCode;
use tower::ServiceExt;

use trend_news_aggregator::aggregate::{
    self, AggregatorConfig, Extractor, FetchBudget, SourceDescriptor, Topic,
};
use trend_news_aggregator::metrics::Metrics;

const TOUTIAO_JSON: &str = include_str!("fixtures/toutiao.json");

fn board(key: &'static str, endpoint: String) -> SourceDescriptor {
    SourceDescriptor {
        key,
        endpoint,
        headers: &[],
        prime: None,
        topic: Topic::Trending,
        origin: "头条",
        extractor: Extractor::Toutiao,
    }
}

#[tokio::test]
async fn metrics_endpoint_exposes_budget_gauges_and_round_series() {
    let metrics = Metrics::init(&AggregatorConfig::default());

    // One round against loopback payloads so the counters have series.
    let payloads = Router::new()
        .route("/ok", get(|| async { TOUTIAO_JSON }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }),
        );
    let addr = common::serve(payloads).await;

    let client = reqwest::Client::new();
    let descriptors = vec![
        board("toutiao", format!("http://{addr}/ok")),
        board("bilibili", format!("http://{addr}/broken")),
    ];
    let budget = FetchBudget {
        per_source_cap: 15,
        request_timeout: Duration::from_secs(2),
        global_timeout: Duration::from_secs(4),
    };
    let outcomes = aggregate::aggregate(&client, &descriptors, &budget).await;
    assert_eq!(outcomes.len(), 2);

    // Scrape through the same router the binary mounts.
    let resp = metrics
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    for needle in [
        "aggregate_trends_request_budget_secs",
        "aggregate_feeds_request_budget_secs",
        "aggregate_items_total",
        "aggregate_failures_total",
        "aggregate_fanout_ms",
        "aggregate_last_round_unix",
        r#"source="toutiao""#,
        r#"reason="http-status:500""#,
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
}
