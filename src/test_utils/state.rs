use rusqlite::Connection;

use crate::{
    AppState, DEFAULT_SEED_URL, db::initialize, pagination::PaginationConfig,
    transaction::YearScope,
};

/// An in-memory database with the tables already created.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// App state over `connection` that matches months in any year, so fixtures
/// can use fixed dates.
pub(crate) fn get_test_app_state(connection: Connection) -> AppState {
    AppState::new(
        connection,
        "Etc/UTC",
        PaginationConfig::default(),
        YearScope::All,
        DEFAULT_SEED_URL,
    )
    .expect("Could not create app state")
}
