//! Expense domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Identifier of an expense row.
///
/// Rows drafted locally carry a `Pending` token until the first save; rows
/// the backend has stored carry its generated numeric key. Keeping the two
/// regimes as explicit variants removes any need to infer "existing" from
/// the shape of an id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExpenseId {
    Pending(Uuid),
    Persisted(i64),
}

impl ExpenseId {
    /// A fresh client-side identifier for a not-yet-saved row.
    pub fn fresh() -> Self {
        ExpenseId::Pending(Uuid::new_v4())
    }

    /// Whether the backend has assigned this id.
    pub fn is_persisted(&self) -> bool {
        matches!(self, ExpenseId::Persisted(_))
    }

    /// The backend key, when persisted.
    pub fn persisted_key(&self) -> Option<i64> {
        match self {
            ExpenseId::Persisted(key) => Some(*key),
            ExpenseId::Pending(_) => None,
        }
    }
}

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseId::Pending(token) => write!(f, "pending:{}", token),
            ExpenseId::Persisted(key) => write!(f, "{}", key),
        }
    }
}

/// A named monetary line item belonging to a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: Decimal,
}

impl Expense {
    /// A locally drafted expense with a fresh pending id.
    pub fn draft(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: ExpenseId::fresh(),
            name: name.into(),
            amount,
        }
    }
}

/// Validated input for adding an expense line.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct NewExpense {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_non_negative"))]
    pub amount: Decimal,
}

fn validate_non_negative(amount: &Decimal) -> Result<(), validator::ValidationError> {
    if amount.is_sign_negative() {
        Err(validator::ValidationError::new("negative_amount")
            .with_message(std::borrow::Cow::Borrowed("Amount must not be negative")))
    } else {
        Ok(())
    }
}
