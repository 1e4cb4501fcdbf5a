//! PostgREST-style implementation of the row-store contract.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::BackendError;
use crate::store::{Filter, RowStore};

/// HTTP client for the hosted backend's row API.
///
/// Requests carry the project api key; once a member signs in, the session
/// access token is forwarded as the bearer credential so row-level security
/// applies to the member rather than the anonymous role.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: RwLock::new(None),
        }
    }

    /// Replace the bearer credential; `None` falls back to the api key.
    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.access_token.read().await;
        let bearer = token.as_deref().unwrap_or(&self.api_key);
        request
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    async fn rows_from(response: reqwest::Response) -> Result<Vec<Value>, BackendError> {
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        let body: Value = response.json().await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(BackendError::Schema(format!(
                "expected a row array, got {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl RowStore for RestClient {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&str>,
        columns: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        let mut query: Vec<(String, String)> = filters
            .iter()
            .map(|filter| (filter.column.clone(), format!("eq.{}", filter.value)))
            .collect();
        if let Some(column) = order {
            query.push(("order".to_string(), format!("{}.asc", column)));
        }
        if let Some(projection) = columns {
            query.push(("select".to_string(), projection.to_string()));
        }

        debug!(table, ?query, "select");
        let request = self.http.get(self.table_url(table)).query(&query);
        let response = self.authed(request).await.send().await?;
        Self::rows_from(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, BackendError> {
        debug!(table, "insert");
        let request = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&row);
        let response = self.authed(request).await.send().await?;
        let rows = Self::rows_from(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Schema("insert returned no rows".to_string()))
    }

    async fn update(&self, table: &str, id: i64, patch: Value) -> Result<Value, BackendError> {
        debug!(table, id, "update");
        let request = self
            .http
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch);
        let response = self.authed(request).await.send().await?;
        let rows = Self::rows_from(response).await?;
        rows.into_iter().next().ok_or(BackendError::NotFound)
    }

    async fn delete(&self, table: &str, id: i64) -> Result<(), BackendError> {
        debug!(table, id, "delete");
        let request = self
            .http
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))]);
        let response = self.authed(request).await.send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(())
    }
}
