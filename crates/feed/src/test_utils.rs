//! Test double for the event-source contract.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use domain::models::EventRecord;

use crate::error::FeedError;
use crate::EventSource;

/// An event source answering from a fixed list, with failure injection.
#[derive(Default)]
pub struct StaticEvents {
    events: Vec<EventRecord>,
    fail: AtomicBool,
}

impl StaticEvents {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self {
            events,
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_fetches(&self) {
        self.fail.store(true, Ordering::Relaxed);
    }

    fn check(&self) -> Result<(), FeedError> {
        if self.fail.load(Ordering::Relaxed) {
            Err(FeedError::Parse("injected feed failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EventSource for StaticEvents {
    async fn events(&self, _feed_url: Option<&str>) -> Result<Vec<EventRecord>, FeedError> {
        self.check()?;
        Ok(self.events.clone())
    }

    async fn event_by_id(
        &self,
        _feed_url: Option<&str>,
        event_id: &str,
    ) -> Result<Option<EventRecord>, FeedError> {
        self.check()?;
        Ok(self
            .events
            .iter()
            .find(|event| event.id == event_id)
            .cloned())
    }
}

/// A minimal event record for tests.
pub fn sample_event(id: &str, title: &str) -> EventRecord {
    EventRecord {
        id: id.to_string(),
        title: title.to_string(),
        link: format!("https://jagsync.tamusa.edu/event/{}", id),
        host: "ACM".to_string(),
        location: "Science Hall".to_string(),
        description_html: "<p>details</p>".to_string(),
        start: None,
        end: None,
        image_url: None,
    }
}
