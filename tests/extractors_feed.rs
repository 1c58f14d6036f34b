// tests/extractors_feed.rs
//
// Feed-XML extraction against a captured Google News search feed.
//
// Covered:
// - CDATA and entity-escaped titles normalize to the same plain text
// - <source> text wins, absent tags fall back to the descriptor origin
// - the cap counts collected items, so skipped entries do not eat slots
// - zero-item and malformed documents

use trend_news_aggregator::aggregate::{Extractor, SourceDescriptor, Topic};

const GOOGLE_NEWS_XML: &str = include_str!("fixtures/google_news.xml");

fn feed_desc() -> SourceDescriptor {
    SourceDescriptor {
        key: "news-trade-en",
        endpoint: "http://unused.invalid/rss".to_string(),
        headers: &[],
        prime: None,
        topic: Topic::TradeEconomy,
        origin: "Google News",
        extractor: Extractor::GoogleNewsRss,
    }
}

#[test]
fn decodes_cdata_and_entity_titles() {
    let desc = feed_desc();
    let items = desc
        .extractor
        .extract(GOOGLE_NEWS_XML, &desc, 10)
        .expect("parse feed");

    assert_eq!(
        items[0].title,
        "Japan, China agree to restart trade dialogue - Reuters"
    );
    assert_eq!(items[1].title, "Tokyo & Beijing resume trade talks - Nikkei Asia");
    // Double-escaped quotes need the post-XML entity pass.
    assert_eq!(
        items[2].title,
        "\"Chip curbs\" reshape supply chains - Financial Times"
    );
}

#[test]
fn ampersand_and_angle_bracket_entities_decode_in_both_title_forms() {
    let desc = feed_desc();
    // Plain titles are unescaped by the XML layer; CDATA titles keep the
    // entity text and rely on the post-XML pass. Both must land on the
    // same plain string.
    let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel>
      <item>
        <title>A &amp; B &lt;tag&gt;</title>
        <link>https://news.google.com/rss/articles/plain?oc=5</link>
      </item>
      <item>
        <title><![CDATA[A &amp; B &lt;tag&gt;]]></title>
        <link>https://news.google.com/rss/articles/cdata?oc=5</link>
      </item>
    </channel></rss>"#;

    let items = desc.extractor.extract(xml, &desc, 10).expect("parse feed");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "A & B <tag>");
    assert_eq!(items[1].title, "A & B <tag>");
}

#[test]
fn cap_counts_collected_items_not_scanned_entries() {
    let desc = feed_desc();
    // Fixture has six entries, one with an empty title. Cap 4 must still
    // deliver four items because the empty entry does not take a slot.
    let items = desc
        .extractor
        .extract(GOOGLE_NEWS_XML, &desc, 4)
        .expect("parse feed");
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|i| !i.title.is_empty()));
    assert!(
        items.iter().all(|i| !i.title.contains("Kyodo")),
        "fifth valid entry must stay beyond the cap"
    );
}

#[test]
fn source_tag_sets_origin_with_descriptor_fallback() {
    let desc = feed_desc();
    let items = desc
        .extractor
        .extract(GOOGLE_NEWS_XML, &desc, 10)
        .expect("parse feed");

    assert_eq!(items[0].origin, "Reuters");
    assert_eq!(items[1].origin, "Nikkei Asia");
    // The FT entry carries no <source> tag.
    assert_eq!(items[2].origin, "Google News");
}

#[test]
fn items_keep_raw_pub_dates_and_link_ids() {
    let desc = feed_desc();
    let items = desc
        .extractor
        .extract(GOOGLE_NEWS_XML, &desc, 10)
        .expect("parse feed");

    assert_eq!(
        items[0].published_at.as_deref(),
        Some("Thu, 21 Aug 2025 07:12:00 GMT")
    );
    assert_eq!(items[0].id, items[0].url);
    assert!(items[0].url.starts_with("https://news.google.com/rss/articles/"));
    assert_eq!(items[0].topic, Topic::TradeEconomy);
    assert!(items.iter().all(|i| i.metric_hint.is_none()));
}

#[test]
fn feed_with_no_entries_is_an_empty_success() {
    let desc = feed_desc();
    let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>empty</title></channel></rss>"#;
    let items = desc.extractor.extract(xml, &desc, 4).expect("parse feed");
    assert!(items.is_empty());
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let desc = feed_desc();
    assert!(desc
        .extractor
        .extract("<rss><channel><item>broken", &desc, 4)
        .is_err());
    assert!(desc.extractor.extract("{\"not\": \"xml\"}", &desc, 4).is_err());
}
