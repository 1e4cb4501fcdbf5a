//! Profile repository.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use domain::models::{Organization, Profile};

use crate::error::BackendError;
use crate::store::{Filter, RowStore};

// Declared row schema for the `profiles` table, with the organization
// embedded under the backend's join name.
#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: Uuid,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    organization_id: Option<i64>,
    #[serde(default, rename = "organizations")]
    organization: Option<Organization>,
}

fn profile_from_row(row: Value) -> Result<Profile, BackendError> {
    let parsed: ProfileRow =
        serde_json::from_value(row).map_err(|err| BackendError::Schema(err.to_string()))?;
    Ok(Profile {
        id: parsed.id,
        username: parsed.username,
        organization_id: parsed.organization_id,
        organization: parsed.organization,
    })
}

/// Repository for profile rows.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn RowStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// Fetch a profile by user id, joining the organization so callers get
    /// the feed link and balance source in one read.
    pub async fn fetch(&self, user_id: Uuid) -> Result<Option<Profile>, BackendError> {
        let rows = self
            .store
            .select(
                "profiles",
                &[Filter::eq("id", user_id)],
                None,
                Some("*,organizations(*)"),
            )
            .await?;
        rows.into_iter().next().map(profile_from_row).transpose()
    }

    /// Provision a profile row for a newly registered user.
    pub async fn create(&self, user_id: Uuid, username: &str) -> Result<Profile, BackendError> {
        let row = self
            .store
            .insert(
                "profiles",
                json!({ "id": user_id, "username": username }),
            )
            .await?;
        profile_from_row(row)
    }
}
