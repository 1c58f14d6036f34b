//! Merge stage: flattens per-source outcomes into one recency-ordered list,
//! or groups them per platform for the board view.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::DateTime;

use super::types::{FetchOutcome, NewsItem};

/// Seconds since epoch for an upstream date string. Feeds publish RFC 2822,
/// JSON boards RFC 3339; anything else sorts as oldest rather than being
/// dropped.
pub(crate) fn published_unix(raw: &str) -> i64 {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}

/// One flat list, newest first. The sort is stable, so items with equal or
/// missing dates keep their fan-out submission order.
pub fn merge_sorted(outcomes: Vec<FetchOutcome>) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = outcomes
        .into_iter()
        .flat_map(FetchOutcome::into_items)
        .collect();
    items.sort_by_key(|item| {
        Reverse(
            item.published_at
                .as_deref()
                .map(published_unix)
                .unwrap_or(0),
        )
    });
    items
}

/// Per-platform grouping for the full-board view. Failed sources appear with
/// empty lists; each source's items keep their upstream order untouched.
pub fn group_by_source(
    outcomes: Vec<FetchOutcome>,
) -> (BTreeMap<&'static str, Vec<NewsItem>>, usize) {
    let mut platforms = BTreeMap::new();
    let mut total = 0;
    for outcome in outcomes {
        let key = outcome.key;
        let items = outcome.into_items();
        total += items.len();
        platforms.insert(key, items);
    }
    (platforms, total)
}
