//! Database initialization and access to the shared connection.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, functions::FunctionFlags};

use crate::{Error, transaction::create_transaction_table};

/// The name of the SQL function that lowercases text, including non-ASCII letters.
///
/// SQLite's `LIKE` and `lower()` only fold the case of ASCII letters.
pub(crate) const CASEFOLD_FUNCTION: &str = "casefold";

/// Register the SQL functions the queries rely on and create the tables for
/// the domain models if they do not already exist.
///
/// Functions are registered per connection, so this must be called on every
/// connection before it is queried.
///
/// # Errors
/// Returns an error if a function cannot be registered or a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    register_casefold(connection)?;

    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;

    transaction.commit()
}

fn register_casefold(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        CASEFOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text = context.get::<Option<String>>(0)?;
            Ok(text.map(|text| text.to_lowercase()))
        },
    )
}

/// Acquire the lock on the shared database connection.
///
/// # Errors
/// Returns [Error::StoreUnavailable] if the lock is poisoned.
pub fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|error| Error::StoreUnavailable(error.to_string()))
}
