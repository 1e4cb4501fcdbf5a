//! Expense repository and reconciliation.

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use domain::models::{Expense, ExpenseId};

use crate::error::BackendError;
use crate::store::{Filter, RowStore};

// Declared row schema for the `expenses` table.
#[derive(Debug, Deserialize)]
struct ExpenseRow {
    id: i64,
    name: String,
    amount: Decimal,
}

fn expense_from_row(row: Value) -> Result<Expense, BackendError> {
    let parsed: ExpenseRow =
        serde_json::from_value(row).map_err(|err| BackendError::Schema(err.to_string()))?;
    Ok(Expense {
        id: ExpenseId::Persisted(parsed.id),
        name: parsed.name,
        amount: parsed.amount,
    })
}

/// Repository for expense rows.
#[derive(Clone)]
pub struct ExpenseRepository {
    store: Arc<dyn RowStore>,
}

impl ExpenseRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// All expenses of a plan, ordered by id.
    pub async fn list(&self, plan_id: i64) -> Result<Vec<Expense>, BackendError> {
        let rows = self
            .store
            .select(
                "expenses",
                &[Filter::eq("plan_id", plan_id)],
                Some("id"),
                None,
            )
            .await?;
        rows.into_iter().map(expense_from_row).collect()
    }

    /// Apply a batch of local edits: one delete per tracked id, one update
    /// per persisted row, one insert per pending row.
    ///
    /// All operations are dispatched concurrently and run to completion; the
    /// batch fails on the first error (deletes first, then the list order)
    /// and nothing already applied is rolled back. On success the returned
    /// rows carry backend-assigned ids and should replace local state.
    pub async fn reconcile(
        &self,
        plan_id: i64,
        current: &[Expense],
        deleted_ids: &[i64],
    ) -> Result<Vec<Expense>, BackendError> {
        debug!(
            plan_id,
            rows = current.len(),
            deletes = deleted_ids.len(),
            "reconciling expenses"
        );

        let deletes = deleted_ids.iter().map(|id| self.store.delete("expenses", *id));
        let upserts = current.iter().map(|expense| self.apply_row(plan_id, expense));

        let (delete_results, upsert_results) = tokio::join!(join_all(deletes), join_all(upserts));

        for result in delete_results {
            result?;
        }
        let mut saved = Vec::with_capacity(upsert_results.len());
        for result in upsert_results {
            saved.push(result?);
        }
        Ok(saved)
    }

    async fn apply_row(&self, plan_id: i64, expense: &Expense) -> Result<Expense, BackendError> {
        let row = match expense.id {
            ExpenseId::Persisted(id) => {
                self.store
                    .update(
                        "expenses",
                        id,
                        json!({ "name": expense.name, "amount": expense.amount }),
                    )
                    .await?
            }
            ExpenseId::Pending(_) => {
                self.store
                    .insert(
                        "expenses",
                        json!({
                            "plan_id": plan_id,
                            "name": expense.name,
                            "amount": expense.amount,
                        }),
                    )
                    .await?
            }
        };
        expense_from_row(row)
    }
}
