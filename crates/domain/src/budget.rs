//! Budget view-model.
//!
//! Pure arithmetic over an organization balance and a list of expenses.
//! An unknown balance propagates as `None` through the remaining balance;
//! it is never treated as zero, because "Loading..." and "$0.00" are
//! different things to show a user.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Expense;

/// Derived budget figures. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Budget {
    pub organization_balance: Option<Decimal>,
    pub total_expenses: Decimal,
    pub remaining_balance: Option<Decimal>,
}

/// Display classification of the remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl Budget {
    pub fn status(&self) -> BalanceStatus {
        match self.remaining_balance {
            None => BalanceStatus::Unknown,
            Some(remaining) if remaining > Decimal::ZERO => BalanceStatus::Positive,
            Some(remaining) if remaining < Decimal::ZERO => BalanceStatus::Negative,
            Some(_) => BalanceStatus::Neutral,
        }
    }
}

/// Sum of all expense amounts.
pub fn total_expenses(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Compute the derived budget for a balance and expense list.
pub fn compute(organization_balance: Option<Decimal>, expenses: &[Expense]) -> Budget {
    let total = total_expenses(expenses);
    Budget {
        organization_balance,
        total_expenses: total,
        remaining_balance: organization_balance.map(|balance| balance - total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Expense;

    fn expense(amount: i64) -> Expense {
        Expense::draft("line", Decimal::from(amount))
    }

    #[test]
    fn test_unknown_balance_propagates() {
        let budget = compute(None, &[expense(30), expense(20)]);
        assert_eq!(budget.organization_balance, None);
        assert_eq!(budget.total_expenses, Decimal::from(50));
        assert_eq!(budget.remaining_balance, None);
        assert_eq!(budget.status(), BalanceStatus::Unknown);
    }

    #[test]
    fn test_remaining_balance_arithmetic() {
        let budget = compute(Some(Decimal::from(100)), &[expense(30), expense(20)]);
        assert_eq!(budget.total_expenses, Decimal::from(50));
        assert_eq!(budget.remaining_balance, Some(Decimal::from(50)));
        assert_eq!(budget.status(), BalanceStatus::Positive);
    }

    #[test]
    fn test_overspent_is_negative() {
        let budget = compute(Some(Decimal::from(40)), &[expense(30), expense(20)]);
        assert_eq!(budget.remaining_balance, Some(Decimal::from(-10)));
        assert_eq!(budget.status(), BalanceStatus::Negative);
    }

    #[test]
    fn test_exactly_spent_is_neutral() {
        let budget = compute(Some(Decimal::from(50)), &[expense(30), expense(20)]);
        assert_eq!(budget.remaining_balance, Some(Decimal::ZERO));
        assert_eq!(budget.status(), BalanceStatus::Neutral);
    }

    #[test]
    fn test_empty_expense_list() {
        let budget = compute(Some(Decimal::from(100)), &[]);
        assert_eq!(budget.total_expenses, Decimal::ZERO);
        assert_eq!(budget.remaining_balance, Some(Decimal::from(100)));
    }

    #[test]
    fn test_fractional_amounts() {
        let expenses = vec![
            Expense::draft("stickers", "12.25".parse().unwrap()),
            Expense::draft("banner", "7.50".parse().unwrap()),
        ];
        let budget = compute(Some("20.00".parse().unwrap()), &expenses);
        assert_eq!(budget.total_expenses, "19.75".parse::<Decimal>().unwrap());
        assert_eq!(
            budget.remaining_balance,
            Some("0.25".parse::<Decimal>().unwrap())
        );
    }
}
