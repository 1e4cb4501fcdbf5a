//! The row-store contract.
//!
//! The hosted backend is specified only by the operations this client
//! needs: select-with-filter, insert, update-by-id, and delete-by-id, all
//! over plain JSON rows. Repositories deserialize rows against declared
//! schemas; any deviation is a [`BackendError::Schema`], never a silent
//! fallback or a multi-field key probe.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendError;

/// An equality filter on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }
}

/// Row-level operations against the hosted relational store.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Select rows matching all filters, optionally ordered ascending by
    /// `order` and projected through `columns` (backend-specific syntax;
    /// `None` selects everything).
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        columns: Option<&str>,
    ) -> Result<Vec<Value>, BackendError>;

    /// Insert one row and return the stored representation (including any
    /// backend-generated key).
    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError>;

    /// Patch the row with the given id and return the stored representation.
    async fn update(&self, table: &str, id: i64, patch: Value) -> Result<Value, BackendError>;

    /// Delete the row with the given id. Deleting an absent row is not an
    /// error.
    async fn delete(&self, table: &str, id: i64) -> Result<(), BackendError>;
}
