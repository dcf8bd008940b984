//! Defines the core data models and database functions for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// A product sale, i.e. a product listed for sale and whether it sold.
///
/// To create a new `TransactionRecord`, use [TransactionRecord::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold (or listed, for unsold products).
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// The product category, e.g. "electronics".
    pub category: Option<String>,
    /// Whether the product was sold.
    pub is_sold: bool,
}

impl TransactionRecord {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> NewTransaction {
        NewTransaction {
            title: title.to_owned(),
            description: String::new(),
            price,
            date_of_sale,
            category: None,
            is_sold: false,
        }
    }
}

/// A builder for transactions that have not been saved to the database yet.
///
/// ```ignore
/// use time::macros::datetime;
///
/// let transaction = TransactionRecord::build("Fjallraven Backpack", 329.85, datetime!(2021-11-27 20:29:54 +05:30))
///     .description("Your perfect pack for everyday use")
///     .category(Some("men's clothing"))
///     .is_sold(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The name of the product.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// When the product was sold.
    ///
    /// The calendar date in this timestamp's own offset decides which month
    /// the transaction belongs to.
    pub date_of_sale: OffsetDateTime,
    /// The product category.
    pub category: Option<String>,
    /// Whether the product was sold.
    pub is_sold: bool,
}

impl NewTransaction {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category.map(str::to_owned);
        self
    }

    /// Set whether the product sold.
    pub fn is_sold(mut self, is_sold: bool) -> Self {
        self.is_sold = is_sold;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected by [map_transaction_row], in order.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, date_of_sale, category, is_sold";

const INSERT_TRANSACTION: &str = "INSERT INTO \"transaction\" \
    (title, description, price, date_of_sale, sale_date, category, is_sold) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
#[cfg(test)]
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<TransactionRecord, Error> {
    connection
        .prepare(&format!("{INSERT_TRANSACTION} RETURNING {TRANSACTION_COLUMNS}"))?
        .query_row(
            (
                &transaction.title,
                &transaction.description,
                transaction.price,
                transaction.date_of_sale,
                transaction.date_of_sale.date(),
                &transaction.category,
                transaction.is_sold,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Replace every transaction in the database with `transactions`.
///
/// The existing rows are deleted and the new rows inserted in a single
/// database transaction, so either the whole import succeeds or the store is
/// left untouched. IDs restart from 1.
///
/// Returns the number of inserted transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn replace_all_transactions(
    transactions: &[NewTransaction],
    connection: &mut Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.transaction()?;

    sql_transaction.execute("DELETE FROM \"transaction\"", ())?;
    sql_transaction.execute(
        "DELETE FROM sqlite_sequence WHERE name = 'transaction'",
        (),
    )?;

    {
        let mut statement = sql_transaction.prepare(INSERT_TRANSACTION)?;

        for transaction in transactions {
            statement.execute((
                &transaction.title,
                &transaction.description,
                transaction.price,
                transaction.date_of_sale,
                transaction.date_of_sale.date(),
                &transaction.category,
                transaction.is_sold,
            ))?;
        }
    }

    sql_transaction.commit()?;

    Ok(transactions.len())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
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
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                date_of_sale TEXT NOT NULL,
                sale_date TEXT NOT NULL,
                category TEXT,
                is_sold INTEGER NOT NULL
                )",
        (),
    )?;

    // Every monthly query filters on the sale date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_sale_date ON \"transaction\"(sale_date);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [TRANSACTION_COLUMNS] to a [TransactionRecord].
pub(crate) fn map_transaction_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        date_of_sale: row.get(4)?,
        category: row.get(5)?,
        is_sold: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
