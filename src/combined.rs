//! Runs the listing, statistics and chart queries for a month concurrently and
//! returns them as one response.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::QueryState,
    chart::{CategoryCount, PriceBucket, get_category_breakdown, get_price_histogram},
    db::lock_connection,
    query_params::{ListingParams, MonthParams, MonthQueryParams},
    statistics::{Statistics, get_statistics},
    transaction::{ListingQuery, TransactionPage, list_transactions},
};

/// Everything the dashboard shows for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// The requested page of the month's transactions.
    pub transactions: TransactionPage,
    /// The sale totals for the month.
    pub statistics: Statistics,
    /// The month's transactions counted per price range.
    pub bar_chart_data: Vec<PriceBucket>,
    /// The month's transactions counted per category.
    pub pie_chart_data: Vec<CategoryCount>,
}

/// Run `query` on a blocking thread while holding the connection lock.
async fn run_query<T, F>(db_connection: Arc<Mutex<Connection>>, query: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let connection = lock_connection(&db_connection)?;
        query(&connection)
    })
    .await
    .map_err(|error| {
        tracing::error!("Query task failed: {error}");
        Error::TaskFailed(error.to_string())
    })?
}

/// Get the transaction listing, statistics, price histogram and category
/// breakdown described by `query`.
///
/// The four queries run concurrently. If any of them fails the whole call
/// fails with that error and no partial data is returned.
///
/// # Errors
/// Returns the first error from any of the queries, or [Error::TaskFailed] if
/// a query task panicked.
pub async fn get_combined(
    db_connection: Arc<Mutex<Connection>>,
    query: ListingQuery,
) -> Result<CombinedData, Error> {
    let month = query.month;

    let (transactions, statistics, bar_chart_data, pie_chart_data) = tokio::try_join!(
        run_query(db_connection.clone(), move |conn| list_transactions(&query, conn)),
        run_query(db_connection.clone(), move |conn| get_statistics(&month, conn)),
        run_query(db_connection.clone(), move |conn| get_price_histogram(&month, conn)),
        run_query(db_connection, move |conn| get_category_breakdown(&month, conn)),
    )?;

    Ok(CombinedData {
        transactions,
        statistics,
        bar_chart_data,
        pie_chart_data,
    })
}

/// Get the listing, statistics and chart data for a month in one response.
///
/// Query parameters: `month` (required, 1-12). The listing uses the default
/// search and paging.
pub async fn get_combined_endpoint(
    State(state): State<QueryState>,
    Query(params): Query<MonthQueryParams>,
) -> Result<Json<CombinedData>, Error> {
    let params = MonthParams::parse(params)?;
    let query = state.listing_query(ListingParams {
        month: params.month,
        search: String::new(),
        page: state.pagination_config.default_page,
        per_page: state.pagination_config.default_page_size,
    })?;

    get_combined(state.db_connection.clone(), query)
        .await
        .inspect_err(|error| tracing::error!("Could not get combined data: {error}"))
        .map(Json)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error, build_router, endpoints,
        error::ErrorBody,
        test_utils::{get_test_app_state, get_test_connection},
        transaction::{ListingQuery, MonthFilter, MonthRange, TransactionRecord, create_transaction},
    };

    use super::{CombinedData, get_combined};

    fn seed(connection: &Connection) {
        for (title, price, category, is_sold) in [
            ("Jacket", 55.99, "men's clothing", true),
            ("Backpack", 109.95, "men's clothing", false),
            ("Monitor", 1299.0, "electronics", true),
        ] {
            create_transaction(
                TransactionRecord::build(title, price, datetime!(2024-03-10 9:00 UTC))
                    .category(Some(category))
                    .is_sold(is_sold),
                connection,
            )
            .unwrap();
        }
    }

    fn march_2024_query() -> ListingQuery {
        ListingQuery {
            month: MonthFilter::Range(MonthRange::new(3, 2024).unwrap()),
            search: String::new(),
            page: 1,
            per_page: 10,
        }
    }

    #[tokio::test]
    async fn joins_all_four_queries() {
        let connection = get_test_connection();
        seed(&connection);

        let combined = get_combined(Arc::new(Mutex::new(connection)), march_2024_query())
            .await
            .unwrap();

        assert_eq!(combined.transactions.total, 3);
        assert_eq!(combined.statistics.total_sold_items, 2);
        assert_eq!(combined.statistics.total_not_sold_items, 1);
        assert!((combined.statistics.total_sale_amount - (55.99 + 1299.0)).abs() < 1e-9);
        assert_eq!(combined.bar_chart_data.len(), 11);
        assert_eq!(combined.bar_chart_data[0].count, 1);
        assert_eq!(combined.bar_chart_data[1].count, 1);
        assert_eq!(combined.bar_chart_data[10].count, 1);
        assert_eq!(combined.pie_chart_data.len(), 2);
    }

    #[tokio::test]
    async fn store_failure_fails_the_whole_call() {
        let connection = get_test_connection();
        seed(&connection);
        connection
            .execute("DROP TABLE \"transaction\"", ())
            .unwrap();

        let result = get_combined(Arc::new(Mutex::new(connection)), march_2024_query()).await;

        assert!(matches!(result, Err(Error::SqlError(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn endpoint_uses_listing_defaults() {
        let connection = get_test_connection();
        for i in 0..15 {
            create_transaction(
                TransactionRecord::build(&format!("Product {i}"), 5.0, datetime!(2022-03-01 0:00 UTC)),
                &connection,
            )
            .unwrap();
        }
        let server = TestServer::new(build_router(get_test_app_state(connection)))
            .expect("Could not create test server.");

        let response = server
            .get(endpoints::COMBINED_API)
            .add_query_param("month", "3")
            .await;

        response.assert_status_ok();
        let combined = response.json::<CombinedData>();
        assert_eq!(combined.transactions.page, 1);
        assert_eq!(combined.transactions.per_page, 10);
        assert_eq!(combined.transactions.transactions.len(), 10);
        assert_eq!(combined.transactions.total, 15);
        assert_eq!(combined.statistics.total_not_sold_items, 15);

        let json = response.json::<serde_json::Value>();
        for key in ["transactions", "statistics", "barChartData", "pieChartData"] {
            assert!(json.get(key).is_some(), "missing {key} in {json}");
        }
    }

    #[tokio::test]
    async fn endpoint_store_failure_is_a_server_error_without_data() {
        let state = get_test_app_state(get_test_connection());
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", ())
            .unwrap();
        let server =
            TestServer::new(build_router(state)).expect("Could not create test server.");

        let response = server
            .get(endpoints::COMBINED_API)
            .add_query_param("month", "3")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let json = response.json::<serde_json::Value>();
        assert!(json.get("transactions").is_none());
        assert!(!response.json::<ErrorBody>().message.is_empty());
    }
}
