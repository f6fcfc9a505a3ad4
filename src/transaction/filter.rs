//! The server-side filters for the transactions page.
//!
//! Filters are applied in SQL: an equality constraint on the transaction type
//! and a date window, always sorted by date in descending order. The free-text
//! search composes on top of the rows these filters return and never touches
//! the database (see [super::search]).

use rusqlite::{Connection, ToSql, params_from_iter};
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{Error, auth::UserID};

use super::core::{Transaction, map_transaction_row};

/// Which transaction types to fetch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TypeFilter {
    /// Both income and expense transactions.
    #[default]
    All,
    /// Only income transactions.
    Income,
    /// Only expense transactions.
    Expense,
}

impl TypeFilter {
    /// The value to compare the type column against, or `None` when the
    /// filter does not constrain the type.
    fn as_column_value(self) -> Option<&'static str> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Income => Some("income"),
            TypeFilter::Expense => Some("expense"),
        }
    }

    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Income => "income",
            TypeFilter::Expense => "expense",
        }
    }
}

/// Which date window to fetch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DateFilter {
    /// No date constraint.
    #[default]
    All,
    /// From the first day of the current calendar month.
    #[serde(rename = "this_month")]
    ThisMonth,
    /// From 30 days before today.
    #[serde(rename = "last_30_days")]
    Last30Days,
    /// An explicit date range given by the `from` and `to` query parameters.
    Custom,
}

impl DateFilter {
    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            DateFilter::All => "all",
            DateFilter::ThisMonth => "this_month",
            DateFilter::Last30Days => "last_30_days",
            DateFilter::Custom => "custom",
        }
    }
}

/// An inclusive date window with optional bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateBounds {
    pub(crate) start: Option<Date>,
    pub(crate) end: Option<Date>,
}

/// Resolve a [DateFilter] into concrete date bounds.
///
/// `today` should be the current date in the server's configured local
/// timezone. A custom filter with neither bound set behaves like
/// [DateFilter::All].
pub(crate) fn date_bounds(
    date_filter: DateFilter,
    custom_from: Option<Date>,
    custom_to: Option<Date>,
    today: Date,
) -> DateBounds {
    match date_filter {
        DateFilter::All => DateBounds {
            start: None,
            end: None,
        },
        DateFilter::ThisMonth => DateBounds {
            // The first day of the month is always a valid date.
            start: Some(today.replace_day(1).unwrap()),
            end: None,
        },
        DateFilter::Last30Days => DateBounds {
            start: Some(today - Duration::days(30)),
            end: None,
        },
        DateFilter::Custom => DateBounds {
            start: custom_from,
            end: custom_to,
        },
    }
}

/// Get the transactions owned by `user_id` that match the type filter and
/// date bounds, sorted by date in descending order.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(crate) fn get_transactions(
    user_id: UserID,
    type_filter: TypeFilter,
    bounds: DateBounds,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query = String::from(
        "SELECT id, user_id, title, amount, type, category, date FROM \"transaction\" \
         WHERE user_id = ?1",
    );
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(user_id.as_i64())];

    if let Some(type_value) = type_filter.as_column_value() {
        params.push(Box::new(type_value));
        query.push_str(&format!(" AND type = ?{}", params.len()));
    }

    if let Some(start) = bounds.start {
        params.push(Box::new(start));
        query.push_str(&format!(" AND date >= ?{}", params.len()));
    }

    if let Some(end) = bounds.end {
        params.push(Box::new(end));
        query.push_str(&format!(" AND date <= ?{}", params.len()));
    }

    // Sort by date, and then ID to keep transaction order stable after updates
    query.push_str(" ORDER BY date DESC, id ASC");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}
