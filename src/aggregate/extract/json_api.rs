//! JSON-API decoding for the trending-board upstreams.
//!
//! Board schemas drift without notice, so every payload field is optional at
//! the serde layer and degrades to an empty value instead of a decode error.
//! Only a body that is not JSON at all is reported upward.

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::ExtractError;
use crate::aggregate::types::{NewsItem, SourceDescriptor};

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Item ids arrive as strings on some boards and as numbers on others.
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Trailing digits of a permalink, the stable id for zhihu questions.
fn trailing_digits(url: &str) -> Option<String> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d+)$").unwrap());
    re.captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

// zhihu hot list

#[derive(Debug, Deserialize)]
struct ZhihuFeed {
    #[serde(default)]
    data: Vec<ZhihuRow>,
}

#[derive(Debug, Deserialize)]
struct ZhihuRow {
    target: Option<ZhihuTarget>,
}

#[derive(Debug, Deserialize)]
struct ZhihuTarget {
    title_area: Option<ZhihuArea>,
    excerpt_area: Option<ZhihuArea>,
    metrics_area: Option<ZhihuArea>,
    link: Option<ZhihuLink>,
}

#[derive(Debug, Deserialize)]
struct ZhihuArea {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ZhihuLink {
    url: Option<String>,
}

pub fn zhihu(raw: &str, desc: &SourceDescriptor, cap: usize) -> Result<Vec<NewsItem>, ExtractError> {
    let feed: ZhihuFeed = serde_json::from_str(raw)?;
    let mut out = Vec::new();
    for row in feed.data.into_iter().take(cap) {
        let Some(target) = row.target else { continue };
        let title = target.title_area.and_then(|a| a.text).unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = target.link.and_then(|l| l.url).unwrap_or_default();
        out.push(NewsItem {
            id: trailing_digits(&url).unwrap_or_else(|| url.clone()),
            title,
            url,
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: none_if_empty(target.metrics_area.and_then(|a| a.text)),
            excerpt: none_if_empty(target.excerpt_area.and_then(|a| a.text)),
        });
    }
    Ok(out)
}

// weibo realtime hot search

#[derive(Debug, Deserialize)]
struct WeiboFeed {
    data: Option<WeiboData>,
}

#[derive(Debug, Deserialize)]
struct WeiboData {
    #[serde(default)]
    realtime: Vec<WeiboWord>,
}

#[derive(Debug, Deserialize)]
struct WeiboWord {
    word: Option<String>,
    num: Option<u64>,
    label_name: Option<String>,
}

pub fn weibo(raw: &str, desc: &SourceDescriptor, cap: usize) -> Result<Vec<NewsItem>, ExtractError> {
    let feed: WeiboFeed = serde_json::from_str(raw)?;
    let words = feed.data.map(|d| d.realtime).unwrap_or_default();
    let mut out = Vec::new();
    for entry in words.into_iter().take(cap) {
        let word = entry.word.unwrap_or_default();
        if word.is_empty() {
            continue;
        }
        // Searches link to the "#word#" hashtag form, percent-encoded.
        let query = urlencoding::encode(&format!("#{word}#")).into_owned();
        out.push(NewsItem {
            id: word.clone(),
            title: word,
            url: format!("https://s.weibo.com/weibo?q={query}"),
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: entry
                .num
                .filter(|n| *n > 0)
                .map(|n| format!("{}万", n / 10_000)),
            excerpt: none_if_empty(entry.label_name),
        });
    }
    Ok(out)
}

// toutiao hot board

#[derive(Debug, Deserialize)]
struct ToutiaoBoard {
    #[serde(default)]
    data: Vec<ToutiaoEvent>,
}

#[derive(Debug, Deserialize)]
struct ToutiaoEvent {
    #[serde(rename = "ClusterIdStr")]
    cluster_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "HotValue")]
    hot_value: Option<String>,
}

pub fn toutiao(
    raw: &str,
    desc: &SourceDescriptor,
    cap: usize,
) -> Result<Vec<NewsItem>, ExtractError> {
    let board: ToutiaoBoard = serde_json::from_str(raw)?;
    let mut out = Vec::new();
    for event in board.data.into_iter().take(cap) {
        let title = event.title.unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let id = event.cluster_id.unwrap_or_default();
        let url = if id.is_empty() {
            String::new()
        } else {
            format!("https://www.toutiao.com/trending/{id}/")
        };
        out.push(NewsItem {
            id,
            title,
            url,
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: none_if_empty(event.hot_value),
            excerpt: None,
        });
    }
    Ok(out)
}

// bilibili hot search keywords

#[derive(Debug, Deserialize)]
struct BilibiliBoard {
    #[serde(default)]
    list: Vec<BilibiliWord>,
}

#[derive(Debug, Deserialize)]
struct BilibiliWord {
    keyword: Option<String>,
    show_name: Option<String>,
    heat_score: Option<u64>,
}

pub fn bilibili(
    raw: &str,
    desc: &SourceDescriptor,
    cap: usize,
) -> Result<Vec<NewsItem>, ExtractError> {
    let board: BilibiliBoard = serde_json::from_str(raw)?;
    let mut out = Vec::new();
    for entry in board.list.into_iter().take(cap) {
        let keyword = entry.keyword.unwrap_or_default();
        let title = none_if_empty(entry.show_name).unwrap_or_else(|| keyword.clone());
        if title.is_empty() {
            continue;
        }
        let url = format!(
            "https://search.bilibili.com/all?keyword={}",
            urlencoding::encode(&keyword)
        );
        out.push(NewsItem {
            id: keyword,
            title,
            url,
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: entry.heat_score.filter(|h| *h > 0).map(|h| h.to_string()),
            excerpt: None,
        });
    }
    Ok(out)
}

// douyin hot search (cookie-primed)

#[derive(Debug, Deserialize)]
struct DouyinBoard {
    data: Option<DouyinData>,
}

#[derive(Debug, Deserialize)]
struct DouyinData {
    #[serde(default)]
    word_list: Vec<DouyinWord>,
}

#[derive(Debug, Deserialize)]
struct DouyinWord {
    #[serde(default)]
    sentence_id: Value,
    word: Option<String>,
    hot_value: Option<u64>,
}

pub fn douyin(
    raw: &str,
    desc: &SourceDescriptor,
    cap: usize,
) -> Result<Vec<NewsItem>, ExtractError> {
    let board: DouyinBoard = serde_json::from_str(raw)?;
    let words = board.data.map(|d| d.word_list).unwrap_or_default();
    let mut out = Vec::new();
    for entry in words.into_iter().take(cap) {
        let title = entry.word.unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let id = id_string(&entry.sentence_id);
        let url = if id.is_empty() {
            String::new()
        } else {
            format!("https://www.douyin.com/hot/{id}")
        };
        out.push(NewsItem {
            id,
            title,
            url,
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: entry.hot_value.filter(|h| *h > 0).map(|h| h.to_string()),
            excerpt: None,
        });
    }
    Ok(out)
}

// tieba hot topics

#[derive(Debug, Deserialize)]
struct TiebaFeed {
    data: Option<TiebaData>,
}

#[derive(Debug, Deserialize)]
struct TiebaData {
    bang_topic: Option<TiebaBang>,
}

#[derive(Debug, Deserialize)]
struct TiebaBang {
    #[serde(default)]
    topic_list: Vec<TiebaTopic>,
}

#[derive(Debug, Deserialize)]
struct TiebaTopic {
    #[serde(default)]
    topic_id: Value,
    topic_name: Option<String>,
    topic_url: Option<String>,
}

pub fn tieba(raw: &str, desc: &SourceDescriptor, cap: usize) -> Result<Vec<NewsItem>, ExtractError> {
    let feed: TiebaFeed = serde_json::from_str(raw)?;
    let topics = feed
        .data
        .and_then(|d| d.bang_topic)
        .map(|b| b.topic_list)
        .unwrap_or_default();
    let mut out = Vec::new();
    for topic in topics.into_iter().take(cap) {
        let title = topic.topic_name.unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        out.push(NewsItem {
            id: id_string(&topic.topic_id),
            title,
            url: topic.topic_url.unwrap_or_default(),
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: None,
            excerpt: None,
        });
    }
    Ok(out)
}

// wallstreetcn hot articles

#[derive(Debug, Deserialize)]
struct WscnFeed {
    data: Option<WscnData>,
}

#[derive(Debug, Deserialize)]
struct WscnData {
    #[serde(default)]
    day_items: Vec<WscnArticle>,
}

#[derive(Debug, Deserialize)]
struct WscnArticle {
    #[serde(default)]
    id: Value,
    title: Option<String>,
    uri: Option<String>,
}

pub fn wallstreetcn(
    raw: &str,
    desc: &SourceDescriptor,
    cap: usize,
) -> Result<Vec<NewsItem>, ExtractError> {
    let feed: WscnFeed = serde_json::from_str(raw)?;
    let articles = feed.data.map(|d| d.day_items).unwrap_or_default();
    let mut out = Vec::new();
    for article in articles.into_iter().take(cap) {
        let title = article.title.unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        out.push(NewsItem {
            id: id_string(&article.id),
            title,
            url: article.uri.unwrap_or_default(),
            topic: desc.topic,
            origin: desc.origin.to_string(),
            published_at: None,
            metric_hint: None,
            excerpt: None,
        });
    }
    Ok(out)
}

// thepaper sidebar hot news

#[derive(Debug, Deserialize)]
struct ThepaperSidebar {
    data: Option<ThepaperData>,
}

#[derive(Debug, Deserialize)]
struct ThepaperData {
    #[serde(rename = "hotNews", default)]
    hot_news: Vec<ThepaperStory>,
}

#[derive(Debug, Deserialize)]
struct ThepaperStory {
    #[serde(rename = "contId", default)]
    cont_id: Value,
    name: Option<String>,
}

pub fn thepaper(
    raw: &str,
    desc: &SourceDescriptor,
    cap: usize,
) -> Result<Vec<NewsItem>, ExtractError> {
    let sidebar: ThepaperSidebar = serde_json::from_str(raw)?;
    let stories = sidebar.data.map(|d| d.hot_news).unwrap_or_default();
    let mut out = Vec::new();
    for story in stories.into_iter().take(cap) {
        let title = story.name.unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let id = id_string(&story.cont_id);
        let url = if id.is_empty() {
            String::new()
        } else {
            format!("https://www.thepaper.cn/newsDetail_forward_{id}")
        };
        out.push(NewsItem {
            id,
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

// cls depth home

#[derive(Debug, Deserialize)]
struct ClsHome {
    data: Option<ClsData>,
}

#[derive(Debug, Deserialize)]
struct ClsData {
    #[serde(default)]
    depth_list: Vec<ClsArticle>,
}

#[derive(Debug, Deserialize)]
struct ClsArticle {
    #[serde(default)]
    id: Value,
    title: Option<String>,
    brief: Option<String>,
}

pub fn cls(raw: &str, desc: &SourceDescriptor, cap: usize) -> Result<Vec<NewsItem>, ExtractError> {
    let home: ClsHome = serde_json::from_str(raw)?;
    let articles = home.data.map(|d| d.depth_list).unwrap_or_default();
    let mut out = Vec::new();
    for article in articles.into_iter().take(cap) {
        let title = none_if_empty(article.title)
            .or_else(|| none_if_empty(article.brief))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let id = id_string(&article.id);
        let url = if id.is_empty() {
            String::new()
        } else {
            format!("https://www.cls.cn/detail/{id}")
        };
        out.push(NewsItem {
            id,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_digits_picks_the_question_id() {
        assert_eq!(
            trailing_digits("https://www.zhihu.com/question/1951234567").as_deref(),
            Some("1951234567")
        );
        assert_eq!(trailing_digits("https://www.zhihu.com/roundtable/x"), None);
    }

    #[test]
    fn id_string_accepts_numbers_and_strings() {
        assert_eq!(id_string(&Value::String("25093970".into())), "25093970");
        assert_eq!(id_string(&Value::Number(8123456.into())), "8123456");
        assert_eq!(id_string(&Value::Null), "");
    }
}
