//! RSS feed parsing.
//!
//! The feed is the usual RSS 2.0 shape plus organization-specific item
//! fields (`host`, `location`, `start`, `end`). Every item field is
//! defaulted so one malformed item never aborts the whole batch; only a
//! document without a `channel` is a structural parse failure.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use domain::models::{event_id_from_guid, EventRecord};

use crate::error::FeedError;

#[derive(Debug, Deserialize)]
struct RssXml {
    channel: Option<ChannelXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChannelXml {
    #[serde(rename = "item")]
    items: Vec<ItemXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemXml {
    guid: Option<GuidXml>,
    title: Option<String>,
    link: Option<String>,
    host: Option<String>,
    location: Option<String>,
    description: Option<String>,
    start: Option<String>,
    end: Option<String>,
    enclosure: Option<EnclosureXml>,
}

// <guid isPermaLink="false">…</guid>; only the text content matters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GuidXml {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnclosureXml {
    #[serde(rename = "@url")]
    url: Option<String>,
}

/// Parse a raw RSS document into event records.
///
/// A feed with N items yields exactly N records; a single `<item>` is
/// normalized into a one-element sequence by deserialization.
pub fn parse_feed(xml: &str) -> Result<Vec<EventRecord>, FeedError> {
    let doc: RssXml =
        quick_xml::de::from_str(xml).map_err(|err| FeedError::Parse(err.to_string()))?;

    let channel = doc
        .channel
        .ok_or_else(|| FeedError::Parse("channel element is missing".to_string()))?;

    Ok(channel.items.into_iter().map(event_from_item).collect())
}

fn event_from_item(item: ItemXml) -> EventRecord {
    let guid = item
        .guid
        .and_then(|guid| guid.value)
        .unwrap_or_default();

    let image_url = item
        .enclosure
        .and_then(|enclosure| enclosure.url)
        .filter(|url| !url.is_empty());

    EventRecord {
        id: event_id_from_guid(&guid),
        title: item.title.unwrap_or_default(),
        link: item.link.unwrap_or_default(),
        host: item.host.unwrap_or_default(),
        location: item.location.unwrap_or_default(),
        description_html: item.description.unwrap_or_default(),
        start: item.start.as_deref().and_then(parse_feed_date),
        end: item.end.as_deref().and_then(parse_feed_date),
        image_url,
    }
}

/// Lenient date parsing; feeds are inconsistent about formats.
fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_xml(guid: &str, title: &str) -> String {
        format!(
            r#"<item>
                 <guid isPermaLink="false">{guid}</guid>
                 <title>{title}</title>
                 <link>https://jagsync.tamusa.edu/event/{title}</link>
                 <host>ACM</host>
                 <location>Science Hall</location>
                 <description>&lt;p&gt;details&lt;/p&gt;</description>
                 <start>Fri, 10 Oct 2025 18:00:00 GMT</start>
                 <end>Fri, 10 Oct 2025 20:00:00 GMT</end>
                 <enclosure url="https://cdn.example.edu/{title}.jpg" length="0" type="image/jpeg"/>
               </item>"#
        )
    }

    fn feed_with(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
               <rss version="2.0"><channel><title>ACM Events</title>{items}</channel></rss>"#
        )
    }

    #[test]
    fn test_parse_yields_one_record_per_item() {
        let xml = feed_with(&format!(
            "{}{}{}",
            item_xml("https://jagsync.tamusa.edu/event/101", "a"),
            item_xml("https://jagsync.tamusa.edu/event/102", "b"),
            item_xml("https://jagsync.tamusa.edu/event/103", "c"),
        ));
        let events = parse_feed(&xml).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id, "101");
        assert_eq!(events[1].id, "102");
        assert_eq!(events[2].id, "103");
    }

    #[test]
    fn test_single_item_becomes_one_element_sequence() {
        let xml = feed_with(&item_xml("https://jagsync.tamusa.edu/event/7", "solo"));
        let events = parse_feed(&xml).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "7");
        assert_eq!(events[0].host, "ACM");
        assert_eq!(events[0].location, "Science Hall");
        assert_eq!(events[0].description_html, "<p>details</p>");
        assert!(events[0].start.is_some());
        assert!(events[0].end.is_some());
    }

    #[test]
    fn test_guid_without_digits_keeps_raw_value() {
        let xml = feed_with(&item_xml("urn:uuid:abcdef", "x"));
        let events = parse_feed(&xml).unwrap();
        assert_eq!(events[0].id, "urn:uuid:abcdef");
    }

    #[test]
    fn test_missing_enclosure_means_no_image() {
        let xml = feed_with(
            r#"<item><guid>event/9</guid><title>No Image</title></item>"#,
        );
        let events = parse_feed(&xml).unwrap();
        assert_eq!(events[0].image_url, None);
    }

    #[test]
    fn test_empty_enclosure_url_means_no_image() {
        let xml = feed_with(
            r#"<item><guid>event/9</guid><enclosure url="" length="0" type=""/></item>"#,
        );
        let events = parse_feed(&xml).unwrap();
        assert_eq!(events[0].image_url, None);
    }

    #[test]
    fn test_malformed_item_does_not_abort_batch() {
        let xml = feed_with(&format!(
            "<item></item>{}",
            item_xml("https://jagsync.tamusa.edu/event/5", "ok")
        ));
        let events = parse_feed(&xml).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "");
        assert_eq!(events[0].title, "");
        assert_eq!(events[1].id, "5");
    }

    #[test]
    fn test_empty_channel_yields_no_events() {
        let events = parse_feed(&feed_with("")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_missing_channel_is_parse_error() {
        let err = parse_feed(r#"<rss version="2.0"></rss>"#).unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn test_unparseable_dates_become_none() {
        let xml = feed_with(
            r#"<item><guid>event/3</guid><start>whenever</start><end></end></item>"#,
        );
        let events = parse_feed(&xml).unwrap();
        assert_eq!(events[0].start, None);
        assert_eq!(events[0].end, None);
    }

    #[test]
    fn test_date_formats() {
        assert!(parse_feed_date("Fri, 10 Oct 2025 18:00:00 GMT").is_some());
        assert!(parse_feed_date("2025-10-10T18:00:00Z").is_some());
        assert!(parse_feed_date("2025-10-10 18:00:00").is_some());
        assert!(parse_feed_date("next friday").is_none());
    }
}
