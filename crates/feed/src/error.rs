//! Feed error types.

use thiserror::Error;

/// Errors that can occur while fetching or parsing the event feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to fetch feed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("feed request returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("feed is missing expected structure: {0}")]
    Parse(String),
}
