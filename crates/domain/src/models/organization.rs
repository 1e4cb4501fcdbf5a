//! Organization domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A student organization. Read-only from this client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Organization {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// Current balance; `None` means the balance is unknown, not zero.
    #[serde(default)]
    pub balance: Option<Decimal>,
    /// URL of the organization's event feed.
    #[serde(default)]
    pub link: Option<String>,
}
