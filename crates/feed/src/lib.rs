//! Feed layer for the Budget It client.
//!
//! This crate contains:
//! - RSS/XML parsing into [`domain::models::EventRecord`]s
//! - The HTTP feed client
//! - The [`EventSource`] contract used by page controllers

pub mod client;
pub mod error;
pub mod parser;
pub mod test_utils;

pub use client::FeedClient;
pub use error::FeedError;

use async_trait::async_trait;
use domain::models::EventRecord;

/// Contract for anything that can produce event records.
///
/// `feed_url` is the organization-specific feed; `None` falls back to the
/// configured default.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn events(&self, feed_url: Option<&str>) -> Result<Vec<EventRecord>, FeedError>;

    async fn event_by_id(
        &self,
        feed_url: Option<&str>,
        event_id: &str,
    ) -> Result<Option<EventRecord>, FeedError>;
}
