//! Events listing page.

use std::sync::Arc;

use tracing::debug;

use backend::session::SessionState;
use domain::models::EventRecord;
use feed::EventSource;

use crate::error::PageError;

/// View state for the events listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsView {
    /// "Welcome, {username}" when the profile is loaded, plain fallback
    /// otherwise.
    pub greeting: String,
    pub events: Vec<EventRecord>,
}

/// Controller for the events listing route.
pub struct EventsPage {
    events: Arc<dyn EventSource>,
}

impl EventsPage {
    pub fn new(events: Arc<dyn EventSource>) -> Self {
        Self { events }
    }

    /// Fetch the feed of the member's organization, falling back to the
    /// default feed when the profile carries no link.
    pub async fn load(&self, session: &SessionState) -> Result<EventsView, PageError> {
        let feed_url = session.profile.as_ref().and_then(|profile| profile.feed_link());
        let events = self.events.events(feed_url).await?;
        debug!(count = events.len(), "loaded events feed");

        let greeting = session
            .profile
            .as_ref()
            .and_then(|profile| profile.username.as_deref())
            .map(|username| format!("Welcome, {}", username))
            .unwrap_or_else(|| "Welcome".to_string());

        Ok(EventsView { greeting, events })
    }
}
