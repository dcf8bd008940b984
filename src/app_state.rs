//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    Error,
    db::initialize,
    pagination::PaginationConfig,
    query_params::ListingParams,
    timezone::{current_local_date, get_local_offset},
    transaction::{ListingQuery, MonthFilter, YearScope},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// Whether a month means the month of the current year or of every year.
    pub year_scope: YearScope,

    /// Where the seed endpoint downloads the product feed from.
    pub seed_url: String,

    /// The client used to download the product feed.
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized, the timezone is
    /// not recognised or the page sizes are invalid.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        pagination_config: PaginationConfig,
        year_scope: YearScope,
        seed_url: &str,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        pagination_config.validate()?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            year_scope,
            seed_url: seed_url.to_owned(),
            http_client: reqwest::Client::new(),
        })
    }
}

/// The state needed by the read-only monthly queries.
#[derive(Debug, Clone)]
pub struct QueryState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
    /// Whether a month means the month of the current year or of every year.
    pub year_scope: YearScope,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for QueryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            year_scope: state.year_scope,
            pagination_config: state.pagination_config.clone(),
        }
    }
}

impl QueryState {
    /// Today's date in the server's timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the configured timezone is not recognised.
    pub fn today(&self) -> Result<Date, Error> {
        current_local_date(&self.local_timezone)
    }

    /// Resolve `month` into a filter using the configured year scope.
    ///
    /// # Errors
    /// Returns an error if today's date cannot be determined.
    pub fn month_filter(&self, month: Month) -> Result<MonthFilter, Error> {
        MonthFilter::resolve(month, self.year_scope, self.today()?)
    }

    /// Turn validated listing parameters into a query.
    ///
    /// # Errors
    /// Returns an error if today's date cannot be determined.
    pub fn listing_query(&self, params: ListingParams) -> Result<ListingQuery, Error> {
        Ok(ListingQuery {
            month: self.month_filter(params.month)?,
            search: params.search,
            page: params.page,
            per_page: params.per_page,
        })
    }
}
