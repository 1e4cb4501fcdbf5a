//! Shared helpers for page-controller integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use backend::repositories::{ExpenseRepository, OrganizationRepository, PlanRepository};
use backend::test_utils::MemoryStore;
use backend::{BackendError, Filter, RowStore};
use budgetit_app::pages::{CreatePlanPage, EditPlanPage};
use feed::test_utils::StaticEvents;

pub const ORG_ID: i64 = 3;

pub fn org_row(balance: &str) -> Value {
    json!({ "id": ORG_ID, "name": "ACM", "balance": balance, "link": "https://example.edu/acm.rss" })
}

pub fn plan_row(id: i64, event_id: i64) -> Value {
    json!({ "id": id, "event_id": event_id })
}

pub fn expense_row(id: i64, plan_id: i64, name: &str, amount: &str) -> Value {
    json!({ "id": id, "plan_id": plan_id, "name": name, "amount": amount })
}

pub fn create_page(
    event_id: &str,
    source: Arc<StaticEvents>,
    store: Arc<MemoryStore>,
    cancel: CancellationToken,
) -> CreatePlanPage {
    CreatePlanPage::new(
        event_id.to_string(),
        source,
        PlanRepository::new(store.clone()),
        OrganizationRepository::new(store.clone()),
        ExpenseRepository::new(store),
        cancel,
    )
}

/// Delegates to an inner store, but answers inserts slowly. Lets tests
/// cancel a page while a save is in flight.
pub struct SlowInserts {
    inner: Arc<MemoryStore>,
    delay: Duration,
}

impl SlowInserts {
    pub fn new(inner: Arc<MemoryStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl RowStore for SlowInserts {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        columns: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        self.inner.select(table, filters, order, columns).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError> {
        tokio::time::sleep(self.delay).await;
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: i64, patch: Value) -> Result<Value, BackendError> {
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: i64) -> Result<(), BackendError> {
        self.inner.delete(table, id).await
    }
}

pub fn edit_page(
    event_id: &str,
    source: Arc<StaticEvents>,
    store: Arc<MemoryStore>,
    cancel: CancellationToken,
) -> EditPlanPage {
    EditPlanPage::new(
        event_id.to_string(),
        source,
        PlanRepository::new(store.clone()),
        OrganizationRepository::new(store.clone()),
        ExpenseRepository::new(store),
        cancel,
    )
}
