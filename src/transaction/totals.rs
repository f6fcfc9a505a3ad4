//! Derives the summary figures shown above the transaction list.
//!
//! The totals reflect the rows returned by the active server-side filters,
//! not the full history: changing the type or date filter changes what the
//! totals mean. The free-text search does not affect them.

use super::core::{Transaction, TransactionType};

/// The derived summary figures for a list of transactions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Totals {
    /// The sum of the amounts of all income transactions.
    pub(crate) income: f64,
    /// The sum of the amounts of all expense transactions.
    pub(crate) expense: f64,
    /// `income - expense`.
    pub(crate) balance: f64,
}

/// Sum the income and expense amounts of `transactions`.
pub(crate) fn compute_totals(transactions: &[Transaction]) -> Totals {
    let income = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Income)
        .map(|transaction| transaction.amount)
        .sum();
    let expense = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
        .map(|transaction| transaction.amount)
        .sum();

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}
