//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for mapping to transaction IDs.
pub type TransactionId = i64;

/// Whether a transaction brought money in or took money out.
///
/// The amount of a transaction is always positive, the direction of the money
/// flow is carried by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The value used to store the transaction type in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(()),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user that created the transaction.
    pub user_id: UserID,
    /// A short text describing what the transaction was for.
    pub title: String,
    /// The amount of money that changed hands. Always positive.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// A free text category, e.g. "Groceries", "Transport", "Rent".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

/// The validated fields for creating or updating a [Transaction].
///
/// Values of this type only come out of form validation, so the invariants of
/// the transaction model (non-empty title and category, strictly positive
/// amount, valid date) hold by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short text describing what the transaction was for.
    pub title: String,
    /// The amount of money that changed hands. Always positive.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
    /// A free text category, e.g. "Groceries", "Transport", "Rent".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database, owned by the user `user_id`.
///
/// The ID of the returned transaction is assigned by the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, title, amount, type, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, title, amount, type, category, date",
        )?
        .query_row(
            (
                user_id.as_i64(),
                new_transaction.title,
                new_transaction.amount,
                new_transaction.transaction_type.as_str(),
                new_transaction.category,
                new_transaction.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction owned by `user_id` from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, title, amount, type, category, date FROM \"transaction\" \
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Overwrite the fields of the transaction `id` owned by `user_id`.
///
/// The update is all-or-nothing: either every field from `new_transaction` is
/// written, or the row is left untouched. The ID and owner of a transaction
/// never change.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction owned by `user_id`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET title = ?1, amount = ?2, type = ?3, category = ?4, date = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            new_transaction.title,
            new_transaction.amount,
            new_transaction.transaction_type.as_str(),
            new_transaction.category,
            new_transaction.date,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

pub(crate) type RowsAffected = usize;

/// Delete the transaction `id` owned by `user_id`.
///
/// Returns the number of rows deleted, which is zero when `id` does not refer
/// to a transaction owned by `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub(crate) fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )
        .map_err(|err| err.into())
}

/// Get the number of transactions owned by `user_id`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = :user_id",
            &[(":user_id", &user_id.as_i64())],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Add composite index used by the transactions page.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
///
/// Rows with an unknown transaction type are rejected rather than passed
/// through to the view layer.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id: i64 = row.get(1)?;
    let title = row.get(2)?;
    let amount = row.get(3)?;
    let raw_type: String = row.get(4)?;
    let category = row.get(5)?;
    let date = row.get(6)?;

    let transaction_type = TransactionType::from_str(&raw_type).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("unknown transaction type \"{raw_type}\"").into(),
        )
    })?;

    Ok(Transaction {
        id,
        user_id: UserID::new(user_id),
        title,
        amount,
        transaction_type,
        category,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================
