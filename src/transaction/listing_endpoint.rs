//! The JSON endpoint for listing a month's transactions.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    Error,
    app_state::QueryState,
    db::lock_connection,
    query_params::{ListingParams, ListingQueryParams},
};

use super::listing::{TransactionPage, list_transactions};

/// Get one page of the transactions for a month, optionally filtered by a search term.
///
/// Query parameters: `month` (required, 1-12), `search`, `page` and `perPage`.
pub async fn get_transactions_endpoint(
    State(state): State<QueryState>,
    Query(params): Query<ListingQueryParams>,
) -> Result<Json<TransactionPage>, Error> {
    let params = ListingParams::parse(params, &state.pagination_config)?;
    let query = state.listing_query(params)?;

    let connection = lock_connection(&state.db_connection)?;

    list_transactions(&query, &connection)
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))
        .map(Json)
}
