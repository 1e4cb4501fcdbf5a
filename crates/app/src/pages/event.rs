//! Event detail page.

use std::sync::Arc;

use domain::models::EventRecord;
use feed::EventSource;

use crate::error::PageError;

/// Controller for the event detail route.
pub struct EventPage {
    events: Arc<dyn EventSource>,
}

impl EventPage {
    pub fn new(events: Arc<dyn EventSource>) -> Self {
        Self { events }
    }

    /// Look the event up in the feed by its id.
    pub async fn load(
        &self,
        feed_url: Option<&str>,
        event_id: &str,
    ) -> Result<EventRecord, PageError> {
        self.events
            .event_by_id(feed_url, event_id)
            .await?
            .ok_or(PageError::EventNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed::test_utils::{sample_event, StaticEvents};

    #[tokio::test]
    async fn test_load_finds_event_by_id() {
        let source = Arc::new(StaticEvents::new(vec![
            sample_event("101", "Game Night"),
            sample_event("102", "Hack Night"),
        ]));
        let page = EventPage::new(source);
        let event = page.load(None, "102").await.unwrap();
        assert_eq!(event.title, "Hack Night");
    }

    #[tokio::test]
    async fn test_load_missing_event_is_not_found() {
        let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
        let page = EventPage::new(source);
        let err = page.load(None, "999").await.unwrap_err();
        assert!(matches!(err, PageError::EventNotFound));
    }
}
