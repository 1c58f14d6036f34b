//! Concurrent aggregation core: a fan-out scheduler over source descriptors
//! plus the query facade the HTTP layer calls.

pub mod config;
pub mod extract;
pub mod merge;
pub mod sources;
pub mod types;
pub mod worker;

use std::fmt;

use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

pub use self::config::{AggregatorConfig, FetchBudget};
pub use self::extract::Extractor;
pub use self::types::{
    FailureReason, FetchOutcome, NewsItem, PlatformReport, SourceDescriptor, Topic, TrendBoard,
};

fn ensure_metrics_described() {
    static DESCRIBED: OnceCell<()> = OnceCell::new();
    DESCRIBED.get_or_init(|| {
        describe_counter!("aggregate_items_total", "Normalized items produced, by source.");
        describe_counter!(
            "aggregate_failures_total",
            "Failed source fetches, by source and reason."
        );
        describe_histogram!(
            "aggregate_fanout_ms",
            "Wall time of one fan-out round in milliseconds."
        );
        describe_gauge!(
            "aggregate_last_round_unix",
            "Unix time of the last completed fan-out round."
        );
    });
}

/// Fans out one worker per descriptor and collects exactly one outcome per
/// descriptor, in submission order. Every worker runs under the family's
/// global timeout; one that overruns is dropped where it stands and reported
/// as a timeout, and the others are unaffected.
pub async fn aggregate(
    client: &reqwest::Client,
    descriptors: &[SourceDescriptor],
    budget: &FetchBudget,
) -> Vec<FetchOutcome> {
    ensure_metrics_described();
    let started = std::time::Instant::now();

    let workers = descriptors.iter().map(|desc| async move {
        match tokio::time::timeout(
            budget.global_timeout,
            worker::fetch_source(client, desc, budget.request_timeout, budget.per_source_cap),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    source = desc.key,
                    budget_ms = budget.global_timeout.as_millis() as u64,
                    "worker exceeded global budget"
                );
                counter!("aggregate_failures_total", "source" => desc.key, "reason" => "timeout")
                    .increment(1);
                FetchOutcome::failure(desc.key, FailureReason::Timeout)
            }
        }
    });
    let outcomes = join_all(workers).await;

    let elapsed = started.elapsed();
    histogram!("aggregate_fanout_ms").record(elapsed.as_secs_f64() * 1_000.0);
    gauge!("aggregate_last_round_unix").set(Utc::now().timestamp() as f64);
    info!(
        sources = outcomes.len(),
        failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "fan-out round complete"
    );
    outcomes
}

/// Platform selector that matches no configured board; echoed back in the
/// HTTP 400 body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform {
    pub requested: String,
}

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform: {}", self.requested)
    }
}

impl std::error::Error for UnknownPlatform {}

/// Shared HTTP client and source catalogs behind every query. One instance
/// lives in the router state for the life of the process.
pub struct Aggregator {
    client: reqwest::Client,
    config: AggregatorConfig,
    trend_sources: Vec<SourceDescriptor>,
    feed_sources: Vec<SourceDescriptor>,
}

impl Aggregator {
    /// Facade over the production catalog.
    pub fn new(config: AggregatorConfig) -> Self {
        Self::with_sources(config, sources::trend_sources(), sources::feed_sources())
    }

    /// Same facade over an arbitrary descriptor set.
    pub fn with_sources(
        config: AggregatorConfig,
        trend_sources: Vec<SourceDescriptor>,
        feed_sources: Vec<SourceDescriptor>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            trend_sources,
            feed_sources,
        }
    }

    /// Keys of the configured trending boards, catalog order.
    pub fn platform_keys(&self) -> Vec<&'static str> {
        self.trend_sources.iter().map(|d| d.key).collect()
    }

    /// One board by key. An unknown key is rejected before any network work
    /// is scheduled.
    pub async fn fetch_platform(&self, key: &str) -> Result<PlatformReport, UnknownPlatform> {
        let Some(desc) = self.trend_sources.iter().find(|d| d.key == key) else {
            return Err(UnknownPlatform {
                requested: key.to_string(),
            });
        };
        let mut outcomes =
            aggregate(&self.client, std::slice::from_ref(desc), &self.config.trends).await;
        let outcome = outcomes
            .pop()
            .unwrap_or_else(|| FetchOutcome::failure(desc.key, FailureReason::Transport));
        let items = outcome.into_items();
        Ok(PlatformReport {
            platform: desc.key,
            count: items.len(),
            items,
        })
    }

    /// The whole board set in one concurrent round. Failed boards come back
    /// as empty lists, never as a missing entry or a request error.
    pub async fn fetch_all_platforms(&self) -> TrendBoard {
        let outcomes = aggregate(&self.client, &self.trend_sources, &self.config.trends).await;
        let (platforms, total_count) = merge::group_by_source(outcomes);
        TrendBoard {
            platforms,
            total_count,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Every news feed in one round, merged newest first.
    pub async fn fetch_news(&self) -> Vec<NewsItem> {
        let outcomes = aggregate(&self.client, &self.feed_sources, &self.config.feeds).await;
        merge::merge_sorted(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_platform_is_rejected_without_fetching() {
        let agg = Aggregator::with_sources(AggregatorConfig::default(), vec![], vec![]);
        let err = agg.fetch_platform("nope").await.expect_err("must reject");
        assert_eq!(err.requested, "nope");
        assert_eq!(err.to_string(), "unknown platform: nope");
    }

    #[test]
    fn default_catalog_exposes_eleven_boards() {
        let agg = Aggregator::new(AggregatorConfig::default());
        let keys = agg.platform_keys();
        assert_eq!(keys.len(), 11);
        assert!(keys.contains(&"zhihu"));
        assert!(keys.contains(&"douyin"));
        assert!(keys.contains(&"cls"));
    }
}
