//! Local expense editing buffer.
//!
//! Holds the in-progress expense list between saves and tracks which
//! persisted rows the member removed, so a save can be reconciled as one
//! batch of deletes, updates, and inserts.

use rust_decimal::Decimal;
use validator::Validate;

use domain::budget::{self, Budget};
use domain::models::{Expense, ExpenseId, NewExpense};

use crate::error::PageError;

/// Edit buffer for one plan's expenses.
#[derive(Debug, Clone, Default)]
pub struct ExpenseEditor {
    expenses: Vec<Expense>,
    deleted_ids: Vec<i64>,
}

impl ExpenseEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from rows already persisted on the backend.
    pub fn with_rows(expenses: Vec<Expense>) -> Self {
        Self {
            expenses,
            deleted_ids: Vec::new(),
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Persisted row ids removed since the last save.
    pub fn deleted_ids(&self) -> &[i64] {
        &self.deleted_ids
    }

    /// Validate and append a new expense line as a local draft.
    pub fn add(&mut self, input: NewExpense) -> Result<ExpenseId, PageError> {
        input.validate()?;
        let expense = Expense::draft(input.name, input.amount);
        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    /// Rename an existing line and/or change its amount.
    pub fn edit(&mut self, id: &ExpenseId, input: NewExpense) -> Result<(), PageError> {
        input.validate()?;
        let expense = self
            .expenses
            .iter_mut()
            .find(|expense| expense.id == *id)
            .ok_or(PageError::NotReady)?;
        expense.name = input.name;
        expense.amount = input.amount;
        Ok(())
    }

    /// Remove a line. Persisted rows are remembered for deletion on save;
    /// drafts just disappear.
    pub fn remove(&mut self, id: &ExpenseId) {
        let before = self.expenses.len();
        self.expenses.retain(|expense| expense.id != *id);
        if self.expenses.len() < before {
            if let Some(key) = id.persisted_key() {
                self.deleted_ids.push(key);
            }
        }
    }

    /// Replace the buffer with the rows a save returned. Every row now
    /// carries a backend key, and the delete backlog is settled.
    pub fn replace_with_saved(&mut self, saved: Vec<Expense>) {
        self.expenses = saved;
        self.deleted_ids.clear();
    }

    /// Derived budget against the organization balance.
    pub fn budget(&self, organization_balance: Option<Decimal>) -> Budget {
        budget::compute(organization_balance, &self.expenses)
    }
}
