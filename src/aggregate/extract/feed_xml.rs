//! Syndication-XML decoding for the Google News search feeds.
//!
//! Titles arrive either as CDATA or as entity-escaped text, sometimes both
//! layers at once, so every title goes through one entity-decoding pass after
//! the XML layer has done its own unescaping.

use html_escape::decode_html_entities;
use serde::Deserialize;

use super::ExtractError;
use crate::aggregate::types::{NewsItem, SourceDescriptor};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source: Option<SourceTag>,
}

/// `<source url="...">Reuters</source>`; only the text child matters.
#[derive(Debug, Deserialize)]
struct SourceTag {
    #[serde(rename = "$text")]
    name: Option<String>,
}

/// Decodes one RSS body into at most `cap` items. Entries without a title
/// are dropped; a feed with zero entries is a success with no items.
pub fn news_feed(
    raw: &str,
    desc: &SourceDescriptor,
    cap: usize,
) -> Result<Vec<NewsItem>, ExtractError> {
    let rss: Rss = quick_xml::de::from_str(raw)?;

    let mut out = Vec::new();
    for item in rss.channel.items {
        if out.len() == cap {
            break;
        }
        let title = item
            .title
            .as_deref()
            .map(|t| decode_html_entities(t).trim().to_string())
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = item
            .link
            .map(|l| l.trim().to_string())
            .unwrap_or_default();
        let origin = item
            .source
            .and_then(|s| s.name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| desc.origin.to_string());

        out.push(NewsItem {
            id: if url.is_empty() { title.clone() } else { url.clone() },
            title,
            url,
            topic: desc.topic,
            origin,
            published_at: item.pub_date.filter(|d| !d.is_empty()),
            metric_hint: None,
            excerpt: None,
        });
    }
    Ok(out)
}
