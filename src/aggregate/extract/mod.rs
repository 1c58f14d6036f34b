//! Payload extractors, one per upstream. The registry is a closed enum so
//! adding a source means adding a variant and satisfying every match arm.

pub mod feed_xml;
pub mod html_embed;
pub mod json_api;

use std::fmt;

use super::types::{NewsItem, PayloadKind, SourceDescriptor};

/// Known payload decoders. Dispatch is an exhaustive match, so the compiler
/// flags any variant a new source forgets to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    GoogleNewsRss,
    Zhihu,
    Weibo,
    Baidu,
    Toutiao,
    Bilibili,
    Douyin,
    Tieba,
    Wallstreetcn,
    Thepaper,
    Ifeng,
    Cls,
}

impl Extractor {
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            Extractor::GoogleNewsRss => PayloadKind::FeedXml,
            Extractor::Baidu | Extractor::Ifeng => PayloadKind::HtmlEmbeddedJson,
            Extractor::Zhihu
            | Extractor::Weibo
            | Extractor::Toutiao
            | Extractor::Bilibili
            | Extractor::Douyin
            | Extractor::Tieba
            | Extractor::Wallstreetcn
            | Extractor::Thepaper
            | Extractor::Cls => PayloadKind::JsonApi,
        }
    }

    /// Decodes one raw response body into normalized items, at most `cap` of
    /// them. Partial payloads degrade to fewer items; a body that cannot be
    /// decoded at all is an error the worker reports as a parse failure.
    pub fn extract(
        self,
        raw: &str,
        desc: &SourceDescriptor,
        cap: usize,
    ) -> Result<Vec<NewsItem>, ExtractError> {
        match self {
            Extractor::GoogleNewsRss => feed_xml::news_feed(raw, desc, cap),
            Extractor::Zhihu => json_api::zhihu(raw, desc, cap),
            Extractor::Weibo => json_api::weibo(raw, desc, cap),
            Extractor::Baidu => html_embed::baidu(raw, desc, cap),
            Extractor::Toutiao => json_api::toutiao(raw, desc, cap),
            Extractor::Bilibili => json_api::bilibili(raw, desc, cap),
            Extractor::Douyin => json_api::douyin(raw, desc, cap),
            Extractor::Tieba => json_api::tieba(raw, desc, cap),
            Extractor::Wallstreetcn => json_api::wallstreetcn(raw, desc, cap),
            Extractor::Thepaper => json_api::thepaper(raw, desc, cap),
            Extractor::Ifeng => html_embed::ifeng(raw, desc, cap),
            Extractor::Cls => json_api::cls(raw, desc, cap),
        }
    }
}

/// Why a payload could not be decoded.
#[derive(Debug)]
pub enum ExtractError {
    Json(serde_json::Error),
    Xml(quick_xml::DeError),
    /// The HTML page no longer carries the expected embedded-JSON anchor.
    AnchorNotFound(&'static str),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Json(e) => write!(f, "json: {e}"),
            ExtractError::Xml(e) => write!(f, "xml: {e}"),
            ExtractError::AnchorNotFound(anchor) => {
                write!(f, "embedded-json anchor `{anchor}` not found")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<serde_json::Error> for ExtractError {
    fn from(e: serde_json::Error) -> Self {
        ExtractError::Json(e)
    }
}

impl From<quick_xml::DeError> for ExtractError {
    fn from(e: quick_xml::DeError) -> Self {
        ExtractError::Xml(e)
    }
}
