//! HTTP feed client.

use async_trait::async_trait;
use tracing::debug;

use domain::models::EventRecord;

use crate::error::FeedError;
use crate::parser::parse_feed;
use crate::EventSource;

/// Fetches and parses an organization's RSS event feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    default_url: String,
}

impl FeedClient {
    /// Create a client with the fallback feed URL used when a caller has no
    /// organization-specific link.
    pub fn new(default_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            default_url: default_url.into(),
        }
    }

    /// Fetch the feed at `url` (or the default) and parse it into events.
    pub async fn fetch_events(&self, url: Option<&str>) -> Result<Vec<EventRecord>, FeedError> {
        let url = url.unwrap_or(&self.default_url);
        debug!(url, "fetching event feed");

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let body = response.text().await?;
        let events = parse_feed(&body)?;
        debug!(url, count = events.len(), "parsed event feed");
        Ok(events)
    }

    /// Fetch the feed and pick out the event with the given derived id.
    pub async fn find_event(
        &self,
        url: Option<&str>,
        event_id: &str,
    ) -> Result<Option<EventRecord>, FeedError> {
        let events = self.fetch_events(url).await?;
        Ok(events.into_iter().find(|event| event.id == event_id))
    }
}

#[async_trait]
impl EventSource for FeedClient {
    async fn events(&self, feed_url: Option<&str>) -> Result<Vec<EventRecord>, FeedError> {
        self.fetch_events(feed_url).await
    }

    async fn event_by_id(
        &self,
        feed_url: Option<&str>,
        event_id: &str,
    ) -> Result<Option<EventRecord>, FeedError> {
        self.find_event(feed_url, event_id).await
    }
}
