//! Static catalog of every upstream the service aggregates: eleven trending
//! boards and six Google News search feeds. Adding a source is one entry
//! here plus an [`Extractor`] variant.

use super::extract::Extractor;
use super::types::{SourceDescriptor, Topic};

/// Browser UA several of the boards require before they will answer.
const BROWSER_HEADERS: &[(&str, &str)] = &[(
    "User-Agent",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
)];

/// Plain reader UA for the Google News feeds.
const FEED_HEADERS: &[(&str, &str)] = &[("User-Agent", "Mozilla/5.0 (compatible; RSSReader/1.0)")];

/// The trending boards, in the order the full-board response lists them.
pub fn trend_sources() -> Vec<SourceDescriptor> {
    vec![
        board(
            "zhihu",
            "https://www.zhihu.com/api/v3/feed/topstory/hot-list-web?limit=20&desktop=true",
            "知乎",
            Extractor::Zhihu,
        ),
        board(
            "weibo",
            "https://weibo.com/ajax/side/hotSearch",
            "微博",
            Extractor::Weibo,
        ),
        board(
            "baidu",
            "https://top.baidu.com/board?tab=realtime",
            "百度",
            Extractor::Baidu,
        ),
        board(
            "toutiao",
            "https://www.toutiao.com/hot-event/hot-board/?origin=toutiao_pc",
            "头条",
            Extractor::Toutiao,
        ),
        board(
            "bilibili",
            "https://s.search.bilibili.com/main/hotword?limit=30",
            "B站",
            Extractor::Bilibili,
        ),
        // douyin rejects cookieless API calls, so its descriptor primes
        // against the site root first.
        SourceDescriptor {
            prime: Some("https://www.douyin.com/".to_string()),
            ..board(
                "douyin",
                "https://www.douyin.com/aweme/v1/web/hot/search/list/?device_platform=webapp&aid=6383&channel=channel_pc_web&detail_list=1",
                "抖音",
                Extractor::Douyin,
            )
        },
        board(
            "tieba",
            "https://tieba.baidu.com/hottopic/browse/topicList",
            "贴吧",
            Extractor::Tieba,
        ),
        board(
            "wallstreetcn",
            "https://api-one.wallstcn.com/apiv1/content/articles/hot?period=all",
            "华尔街见闻",
            Extractor::Wallstreetcn,
        ),
        board(
            "thepaper",
            "https://cache.thepaper.cn/contentapi/wwwIndex/rightSidebar",
            "澎湃",
            Extractor::Thepaper,
        ),
        board(
            "ifeng",
            "https://www.ifeng.com/",
            "凤凰网",
            Extractor::Ifeng,
        ),
        board(
            "cls",
            "https://www.cls.cn/v3/depth/home/assembled/1000?app=CailianpressWeb&os=web&sv=8.4.6",
            "财联社",
            Extractor::Cls,
        ),
    ]
}

/// Google News search feeds: three English and three Japanese queries, two
/// per editorial topic.
pub fn feed_sources() -> Vec<SourceDescriptor> {
    vec![
        feed(
            "news-trade-en",
            "https://news.google.com/rss/search?q=Japan+China+Economy+trade+when:7d&hl=en-US&gl=US&ceid=US:en",
            Topic::TradeEconomy,
        ),
        feed(
            "news-security-en",
            "https://news.google.com/rss/search?q=CSIS+China+Japan+Geopolitics+when:14d&hl=en-US&gl=US&ceid=US:en",
            Topic::Geopolitics,
        ),
        feed(
            "news-chips-en",
            "https://news.google.com/rss/search?q=Supply+chain+semiconductor+China+Japan+when:7d&hl=en-US&gl=US&ceid=US:en",
            Topic::Semiconductor,
        ),
        feed(
            "news-trade-ja",
            "https://news.google.com/rss/search?q=%E4%B8%AD%E6%97%A5+%E7%B5%8C%E6%B8%88+when:7d&hl=ja&gl=JP&ceid=JP:ja",
            Topic::TradeEconomy,
        ),
        feed(
            "news-security-ja",
            "https://news.google.com/rss/search?q=%E6%97%A5%E6%9C%AC+%E6%94%BF%E6%B2%BB+%E5%AE%89%E4%BF%9D+when:7d&hl=ja&gl=JP&ceid=JP:ja",
            Topic::Geopolitics,
        ),
        feed(
            "news-chips-ja",
            "https://news.google.com/rss/search?q=%E5%8D%8A%E5%B0%8E%E4%BD%93+%E4%B8%AD%E5%9B%BD+%E4%BE%9B%E7%B5%A6%E7%B6%B2+when:7d&hl=ja&gl=JP&ceid=JP:ja",
            Topic::Semiconductor,
        ),
    ]
}

fn board(
    key: &'static str,
    endpoint: &str,
    origin: &'static str,
    extractor: Extractor,
) -> SourceDescriptor {
    SourceDescriptor {
        key,
        endpoint: endpoint.to_string(),
        headers: BROWSER_HEADERS,
        prime: None,
        topic: Topic::Trending,
        origin,
        extractor,
    }
}

fn feed(key: &'static str, endpoint: &str, topic: Topic) -> SourceDescriptor {
    SourceDescriptor {
        key,
        endpoint: endpoint.to_string(),
        headers: FEED_HEADERS,
        prime: None,
        topic,
        origin: "Google News",
        extractor: Extractor::GoogleNewsRss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_keys_are_unique() {
        let boards = trend_sources();
        let mut keys: Vec<_> = boards.iter().map(|d| d.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), boards.len());
    }

    #[test]
    fn only_douyin_primes() {
        for desc in trend_sources() {
            assert_eq!(desc.prime.is_some(), desc.key == "douyin", "{}", desc.key);
        }
        for desc in feed_sources() {
            assert!(desc.prime.is_none(), "{}", desc.key);
        }
    }

    #[test]
    fn every_feed_is_labeled_google_news() {
        for desc in feed_sources() {
            assert_eq!(desc.origin, "Google News");
            assert_eq!(desc.extractor, Extractor::GoogleNewsRss);
        }
    }
}
