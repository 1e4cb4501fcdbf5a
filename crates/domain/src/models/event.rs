//! Event domain model.
//!
//! Events are sourced entirely from the organization's RSS feed. They live
//! in memory for the duration of a fetch and are never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event parsed from the organization feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventRecord {
    /// Stable identifier derived from the feed GUID (see [`event_id_from_guid`]).
    pub id: String,
    pub title: String,
    pub link: String,
    pub host: String,
    pub location: String,
    pub description_html: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

impl EventRecord {
    /// The event id as the backend's numeric key, when the GUID carried one.
    ///
    /// Ids that fell back to the raw GUID string (no trailing digits) have no
    /// numeric form; plans cannot be created for such events.
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

// Feed GUIDs look like "https://host/event/1234567"; the trailing digit run
// is the stable event key.
lazy_static::lazy_static! {
    static ref TRAILING_DIGITS: regex::Regex = regex::Regex::new(r"(\d+)$").unwrap();
}

/// Derive a stable event id from a feed GUID.
///
/// Returns the trailing run of digits, or the raw GUID string when the GUID
/// carries no digits at its end.
pub fn event_id_from_guid(guid: &str) -> String {
    TRAILING_DIGITS
        .captures(guid)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| guid.to_string())
}
