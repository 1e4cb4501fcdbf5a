//! Page-level error taxonomy.

use backend::BackendError;
use feed::FeedError;
use thiserror::Error;

/// Errors surfaced by page controllers.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Event not found in the feed")]
    EventNotFound,

    /// Plans key on a numeric event id; a guid without a trailing numeric
    /// component cannot be budgeted for.
    #[error("Event id {0:?} has no numeric component")]
    NonNumericEventId(String),

    #[error("Page is not ready for this action")]
    NotReady,

    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
