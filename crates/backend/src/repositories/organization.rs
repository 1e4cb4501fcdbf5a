//! Organization repository.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::BackendError;
use crate::store::{Filter, RowStore};

#[derive(Debug, Deserialize)]
struct BalanceRow {
    #[serde(default)]
    balance: Option<Decimal>,
}

/// Repository for organization rows. Read-only in this client.
#[derive(Clone)]
pub struct OrganizationRepository {
    store: Arc<dyn RowStore>,
}

impl OrganizationRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// The organization's balance. An absent row or a null balance is
    /// "unknown" (`None`), never zero.
    pub async fn balance(&self, org_id: i64) -> Result<Option<Decimal>, BackendError> {
        let rows = self
            .store
            .select(
                "organizations",
                &[Filter::eq("id", org_id)],
                None,
                Some("balance"),
            )
            .await?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };
        let parsed: BalanceRow =
            serde_json::from_value(row).map_err(|err| BackendError::Schema(err.to_string()))?;
        Ok(parsed.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_balance_read() {
        let store = Arc::new(MemoryStore::new());
        store.seed(
            "organizations",
            vec![json!({ "id": 3, "name": "ACM", "balance": "250.75" })],
        );
        let orgs = OrganizationRepository::new(store);
        assert_eq!(
            orgs.balance(3).await.unwrap(),
            Some("250.75".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn test_absent_organization_is_unknown_not_zero() {
        let orgs = OrganizationRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(orgs.balance(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_null_balance_is_unknown() {
        let store = Arc::new(MemoryStore::new());
        store.seed("organizations", vec![json!({ "id": 3, "balance": null })]);
        let orgs = OrganizationRepository::new(store);
        assert_eq!(orgs.balance(3).await.unwrap(), None);
    }
}
