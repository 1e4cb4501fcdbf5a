//! Profile domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Organization;

/// A member profile, keyed by the auth service's user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub organization_id: Option<i64>,
    /// The member's organization, embedded when the read joined it.
    #[serde(default)]
    pub organization: Option<Organization>,
}

impl Profile {
    /// Feed URL of the member's organization, when known.
    pub fn feed_link(&self) -> Option<&str> {
        self.organization
            .as_ref()
            .and_then(|org| org.link.as_deref())
    }
}

/// Default display name for a new profile: the local part of the email.
pub fn default_username(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or(email)
        .to_string()
}
