//! HTML-embedded-JSON decoding for boards that ship their state inside the
//! page markup. The page is scanned for a known anchor, the JSON slice behind
//! it is parsed, and extraction proceeds as for any JSON board. A page
//! without the anchor means the upstream changed its markup.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::ExtractError;
use crate::aggregate::types::{NewsItem, SourceDescriptor};

static BAIDU_ANCHOR: OnceCell<Regex> = OnceCell::new();
static IFENG_ANCHOR: OnceCell<Regex> = OnceCell::new();

fn embedded_json<'a>(
    html: &'a str,
    cell: &OnceCell<Regex>,
    pattern: &'static str,
    anchor: &'static str,
) -> Result<&'a str, ExtractError> {
    let re = cell.get_or_init(|| Regex::new(pattern).unwrap());
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(ExtractError::AnchorNotFound(anchor))
}

/// `1`, `true`, and non-empty strings all mean "set" on baidu's board.
fn flag_set(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Hot scores arrive as decimal strings on baidu, numbers elsewhere.
fn score(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// baidu realtime board, state behind a `<!--s-data:...-->` comment

#[derive(Debug, Deserialize)]
struct BaiduState {
    data: Option<BaiduData>,
}

#[derive(Debug, Deserialize)]
struct BaiduData {
    #[serde(default)]
    cards: Vec<BaiduCard>,
}

#[derive(Debug, Deserialize)]
struct BaiduCard {
    #[serde(default)]
    content: Vec<BaiduEntry>,
}

#[derive(Debug, Deserialize)]
struct BaiduEntry {
    #[serde(rename = "isTop", default)]
    is_top: Value,
    word: Option<String>,
    #[serde(rename = "rawUrl")]
    raw_url: Option<String>,
    #[serde(rename = "hotScore", default)]
    hot_score: Value,
    #[serde(rename = "desc")]
    summary: Option<String>,
}

pub fn baidu(raw: &str, desc: &SourceDescriptor, cap: usize) -> Result<Vec<NewsItem>, ExtractError> {
    let json = embedded_json(raw, &BAIDU_ANCHOR, r"(?s)<!--s-data:(.*?)-->", "s-data")?;
    let state: BaiduState = serde_json::from_str(json)?;

    // Only the first card is the realtime list; pinned entries are skipped
    // before the cap applies.
    let entries = state
        .data
        .and_then(|d| d.cards.into_iter().next())
        .map(|c| c.content)
        .unwrap_or_default();

    let mut out = Vec::new();
    for entry in entries
        .into_iter()
        .filter(|e| !flag_set(&e.is_top))
        .take(cap)
    {
        let title = entry.word.unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = entry.raw_url.unwrap_or_default();
        out.push(NewsItem {
            id: url.clone(),
            title,
            url,
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: score(&entry.hot_score)
                .filter(|n| *n > 0)
                .map(|n| format!("{}万", n / 10_000)),
            excerpt: entry.summary.filter(|s| !s.is_empty()),
        });
    }
    Ok(out)
}

// ifeng front page, state behind `var allData = {...};`

#[derive(Debug, Deserialize)]
struct IfengState {
    #[serde(rename = "hotNews1", default)]
    hot_news: Vec<IfengStory>,
}

#[derive(Debug, Deserialize)]
struct IfengStory {
    title: Option<String>,
    url: Option<String>,
}

pub fn ifeng(raw: &str, desc: &SourceDescriptor, cap: usize) -> Result<Vec<NewsItem>, ExtractError> {
    let json = embedded_json(raw, &IFENG_ANCHOR, r"(?s)var\s+allData\s*=\s*(\{.*?\});", "allData")?;
    let state: IfengState = serde_json::from_str(json)?;

    let mut out = Vec::new();
    for story in state.hot_news.into_iter().take(cap) {
        let title = story.title.unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = story.url.unwrap_or_default();
        out.push(NewsItem {
            id: url.clone(),
            title,
            url,
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: None,
            excerpt: None,
        });
    }
    Ok(out)
}
