//! Groups a month's transactions by category for the pie chart.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::QueryState,
    db::lock_connection,
    query_params::{MonthParams, MonthQueryParams},
    transaction::{MonthFilter, month_filter},
};

/// The number of transactions in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category, `None` for transactions without one.
    pub category: Option<String>,
    /// How many of the month's transactions are in the category.
    pub count: u64,
}

/// Count the transactions of the month described by `month` per category.
///
/// Transactions without a category are counted in their own group. Only
/// categories with at least one transaction are returned.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_category_breakdown(
    month: &MonthFilter,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let filter = month_filter(month);

    connection
        .prepare(&format!(
            "SELECT category, COUNT(id) FROM \"transaction\" \
            WHERE {} GROUP BY category ORDER BY category ASC",
            filter.clause
        ))?
        .query_map(params_from_iter(filter.params.iter()), |row| {
            Ok(CategoryCount {
                category: row.get(0)?,
                count: u64::try_from(row.get::<_, i64>(1)?).unwrap_or_default(),
            })
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Get the category breakdown for a month.
///
/// Query parameters: `month` (required, 1-12).
pub async fn get_pie_chart_endpoint(
    State(state): State<QueryState>,
    Query(params): Query<MonthQueryParams>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    let params = MonthParams::parse(params)?;
    let month = state.month_filter(params.month)?;

    let connection = lock_connection(&state.db_connection)?;

    get_category_breakdown(&month, &connection)
        .inspect_err(|error| tracing::error!("Could not get category breakdown: {error}"))
        .map(Json)
}
