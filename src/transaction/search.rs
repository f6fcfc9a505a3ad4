//! The free-text search over the transactions page.
//!
//! The search runs over rows that have already been fetched with the
//! server-side filters, it never issues a database query. It narrows the
//! displayed list only: the totals on the page are computed before the search
//! is applied.

use super::core::Transaction;

/// Keep the transactions whose title or category contains `query` as a
/// case-insensitive substring.
///
/// An empty query returns the input unchanged. Applying the same query twice
/// returns the same result as applying it once.
pub(crate) fn apply_search(transactions: Vec<Transaction>, query: &str) -> Vec<Transaction> {
    if query.is_empty() {
        return transactions;
    }

    let query = query.to_lowercase();

    transactions
        .into_iter()
        .filter(|transaction| {
            transaction.title.to_lowercase().contains(&query)
                || transaction.category.to_lowercase().contains(&query)
        })
        .collect()
}
