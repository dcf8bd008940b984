//! Product sale transactions.
//!
//! This module contains everything related to transactions:
//! - The `TransactionRecord` model and `NewTransaction` builder
//! - Database functions for storing and replacing transactions
//! - The month range resolver and SQL filters shared by the monthly queries
//! - The paginated, searchable transaction listing and its endpoint

mod core;
mod filter;
mod listing;
mod listing_endpoint;
mod month;

pub use core::{
    NewTransaction, TransactionRecord, create_transaction_table, replace_all_transactions,
};
pub(crate) use filter::month_filter;
pub use listing::{ListingQuery, TransactionPage, list_transactions};
pub use listing_endpoint::get_transactions_endpoint;
pub use month::{MonthFilter, MonthRange, YearScope};

#[cfg(test)]
pub use core::{count_transactions, create_transaction};
