//! Plan repository.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use domain::models::Plan;

use crate::error::BackendError;
use crate::store::{Filter, RowStore};

// Declared row schema for the `plan` table.
#[derive(Debug, Deserialize)]
struct PlanRow {
    id: i64,
    event_id: i64,
}

fn plan_from_row(row: Value) -> Result<Plan, BackendError> {
    let parsed: PlanRow =
        serde_json::from_value(row).map_err(|err| BackendError::Schema(err.to_string()))?;
    Ok(Plan {
        id: parsed.id,
        event_id: parsed.event_id,
    })
}

/// Repository for plan rows.
#[derive(Clone)]
pub struct PlanRepository {
    store: Arc<dyn RowStore>,
}

impl PlanRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// Find the plan for an event, if one exists.
    ///
    /// The schema does not forbid duplicate plans per event; ordering by id
    /// makes the lowest id win deterministically.
    pub async fn find_for_event(&self, event_id: i64) -> Result<Option<Plan>, BackendError> {
        let rows = self
            .store
            .select("plan", &[Filter::eq("event_id", event_id)], Some("id"), None)
            .await?;
        rows.into_iter().next().map(plan_from_row).transpose()
    }

    /// Create a plan for an event.
    ///
    /// The insert must return the generated key per the declared schema; a
    /// response without one is a [`BackendError::Schema`].
    pub async fn create(&self, event_id: i64) -> Result<Plan, BackendError> {
        let row = self
            .store
            .insert("plan", json!({ "event_id": event_id }))
            .await?;
        plan_from_row(row)
    }
}
