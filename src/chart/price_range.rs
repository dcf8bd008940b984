//! Counts a month's transactions in fixed price ranges for the bar chart.

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

/// The width of each price range.
const BUCKET_WIDTH: u32 = 100;
/// The number of bounded price ranges, i.e. `[0, 100)` to `[900, 1000)`.
const BOUNDED_BUCKETS: u32 = 10;
/// The slot of the catch-all range for prices outside `[0, 1000)`.
const CATCH_ALL_SLOT: usize = BOUNDED_BUCKETS as usize;

/// The number of transactions priced within one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBucket {
    /// The label of the range, e.g. "100-200" or "1000-above".
    pub bucket: String,
    /// The inclusive lower bound of the range.
    pub min: u32,
    /// The exclusive upper bound of the range, `None` for the catch-all range.
    pub max: Option<u32>,
    /// The number of transactions in the range.
    pub count: u64,
}

/// The fixed price ranges with zero counts, in ascending order.
fn empty_buckets() -> Vec<PriceBucket> {
    let bounded = (0..BOUNDED_BUCKETS).map(|i| {
        let min = i * BUCKET_WIDTH;
        let max = min + BUCKET_WIDTH;

        PriceBucket {
            bucket: format!("{min}-{max}"),
            min,
            max: Some(max),
            count: 0,
        }
    });

    let upper = BOUNDED_BUCKETS * BUCKET_WIDTH;
    let catch_all = PriceBucket {
        bucket: format!("{upper}-above"),
        min: upper,
        max: None,
        count: 0,
    };

    bounded.chain(std::iter::once(catch_all)).collect()
}

/// Count the transactions of the month described by `month` in each price range.
///
/// Always returns all 11 ranges in ascending order, including the empty ones.
/// Prices outside `[0, 1000)` fall into the final catch-all range, so the
/// counts sum to the number of transactions in the month.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_price_histogram(
    month: &MonthFilter,
    connection: &Connection,
) -> Result<Vec<PriceBucket>, Error> {
    let filter = month_filter(month);

    let mut statement = connection.prepare(&format!(
        "SELECT
            CASE
                WHEN price >= 0 AND price < {upper} THEN CAST(price / {BUCKET_WIDTH} AS INTEGER)
                ELSE {CATCH_ALL_SLOT}
            END AS slot,
            COUNT(id)
        FROM \"transaction\"
        WHERE {}
        GROUP BY slot",
        filter.clause,
        upper = BOUNDED_BUCKETS * BUCKET_WIDTH,
    ))?;

    let slot_counts = statement
        .query_map(params_from_iter(filter.params.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    let mut buckets = empty_buckets();

    for (slot, count) in slot_counts {
        let slot = usize::try_from(slot)
            .unwrap_or(CATCH_ALL_SLOT)
            .min(CATCH_ALL_SLOT);
        buckets[slot].count += u64::try_from(count).unwrap_or_default();
    }

    Ok(buckets)
}

/// Get the price histogram for a month.
///
/// Query parameters: `month` (required, 1-12).
pub async fn get_bar_chart_endpoint(
    State(state): State<QueryState>,
    Query(params): Query<MonthQueryParams>,
) -> Result<Json<Vec<PriceBucket>>, Error> {
    let params = MonthParams::parse(params)?;
    let month = state.month_filter(params.month)?;

    let connection = lock_connection(&state.db_connection)?;

    get_price_histogram(&month, &connection)
        .inspect_err(|error| tracing::error!("Could not get price histogram: {error}"))
        .map(Json)
}
