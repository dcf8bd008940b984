//! Sale totals for a month: the sold amount and the sold/not sold item counts.

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

/// The sale totals for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of the products that sold.
    pub total_sale_amount: f64,
    /// The number of products that sold.
    pub total_sold_items: u64,
    /// The number of products that did not sell.
    pub total_not_sold_items: u64,
}

/// Get the sale totals for the month described by `month`.
///
/// An empty month gives zero for every total.
///
/// # Errors
/// Returns [Error::SqlError] if either query fails.
pub fn get_statistics(month: &MonthFilter, connection: &Connection) -> Result<Statistics, Error> {
    let filter = month_filter(month);

    let (total_sale_amount, total_sold_items): (f64, i64) = connection
        .prepare(&format!(
            "SELECT COALESCE(SUM(price), 0.0), COUNT(id) FROM \"transaction\" \
            WHERE {} AND is_sold = 1",
            filter.clause
        ))?
        .query_row(params_from_iter(filter.params.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

    let total_not_sold_items: i64 = connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM \"transaction\" WHERE {} AND is_sold = 0",
            filter.clause
        ))?
        .query_row(params_from_iter(filter.params.iter()), |row| row.get(0))?;

    Ok(Statistics {
        total_sale_amount,
        total_sold_items: u64::try_from(total_sold_items).unwrap_or_default(),
        total_not_sold_items: u64::try_from(total_not_sold_items).unwrap_or_default(),
    })
}

/// Get the sale totals for a month.
///
/// Query parameters: `month` (required, 1-12).
pub async fn get_statistics_endpoint(
    State(state): State<QueryState>,
    Query(params): Query<MonthQueryParams>,
) -> Result<Json<Statistics>, Error> {
    let params = MonthParams::parse(params)?;
    let month = state.month_filter(params.month)?;

    let connection = lock_connection(&state.db_connection)?;

    get_statistics(&month, &connection)
        .inspect_err(|error| tracing::error!("Could not get statistics: {error}"))
        .map(Json)
}
