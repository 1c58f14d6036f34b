//! Core data model for the aggregation pipeline: normalized items, source
//! descriptors, and per-source fetch outcomes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::extract::Extractor;

/// Editorial bucket a source feeds into. Serialized with the display labels
/// the dashboard renders verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "中日经贸")]
    TradeEconomy,
    #[serde(rename = "政治安保")]
    Geopolitics,
    #[serde(rename = "半导体")]
    Semiconductor,
    #[serde(rename = "热榜")]
    Trending,
}

/// One normalized story or search entry, shared by every source family.
///
/// `published_at` stays in the upstream's own format (RFC 2822 from feeds,
/// RFC 3339 elsewhere); the merge stage parses it when ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub topic: Topic,
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Payload family a descriptor's endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    FeedXml,
    JsonApi,
    HtmlEmbeddedJson,
}

/// Everything the worker needs to fetch and decode one upstream.
///
/// `prime` names an optional cookie-priming URL that is fetched before the
/// real endpoint; the harvested cookies ride along on the second request.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub key: &'static str,
    pub endpoint: String,
    pub headers: &'static [(&'static str, &'static str)],
    pub prime: Option<String>,
    pub topic: Topic,
    pub origin: &'static str,
    pub extractor: Extractor,
}

/// Why a single source produced no items this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Transport,
    HttpStatus(u16),
    Parse,
    Timeout,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transport => f.write_str("transport"),
            FailureReason::HttpStatus(code) => write!(f, "http-status:{code}"),
            FailureReason::Parse => f.write_str("parse"),
            FailureReason::Timeout => f.write_str("timeout"),
        }
    }
}

/// Terminal result of one worker run. Every descriptor handed to the
/// scheduler yields exactly one of these, success or not.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub key: &'static str,
    pub result: Result<Vec<NewsItem>, FailureReason>,
}

impl FetchOutcome {
    pub fn success(key: &'static str, items: Vec<NewsItem>) -> Self {
        Self {
            key,
            result: Ok(items),
        }
    }

    pub fn failure(key: &'static str, reason: FailureReason) -> Self {
        Self {
            key,
            result: Err(reason),
        }
    }

    /// Items produced by this source, empty when the fetch failed.
    pub fn items(&self) -> &[NewsItem] {
        match &self.result {
            Ok(items) => items,
            Err(_) => &[],
        }
    }

    pub fn into_items(self) -> Vec<NewsItem> {
        self.result.unwrap_or_default()
    }
}

/// Response body for a single-platform query.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformReport {
    pub platform: &'static str,
    pub items: Vec<NewsItem>,
    pub count: usize,
}

/// Response body for the full-board query: one entry per platform keyed by
/// descriptor key, failed platforms included with empty item lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBoard {
    pub platforms: BTreeMap<&'static str, Vec<NewsItem>>,
    pub total_count: usize,
    #[serde(rename = "timestamp")]
    pub generated_at: String,
}
