//! Plan domain model.

use serde::{Deserialize, Serialize};

/// A budget record associated with exactly one event.
///
/// The backend schema does not enforce the one-plan-per-event rule; the
/// client enforces it by lookup before creation, taking the lowest id when
/// duplicate rows exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Plan {
    pub id: i64,
    pub event_id: i64,
}
