use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, NewTransaction, db::lock_connection, transaction::replace_all_transactions,
};

use super::feed::fetch_feed;

/// The state needed to seed the store.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to download the product feed from.
    pub seed_url: String,
    /// The client used to download the product feed.
    pub http_client: reqwest::Client,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_url: state.seed_url.clone(),
            http_client: state.http_client.clone(),
        }
    }
}

/// The response to a successful seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResponse {
    /// A human readable summary of the seed.
    pub message: String,
    /// The number of transactions now in the store.
    pub count: usize,
}

/// Replace every stored transaction with the products from the configured feed.
///
/// The store is left untouched if the feed cannot be fetched or the import fails.
pub async fn seed_endpoint(State(state): State<SeedState>) -> Result<Json<SeedResponse>, Error> {
    let transactions: Vec<NewTransaction> = fetch_feed(&state.http_client, &state.seed_url)
        .await?
        .into_iter()
        .map(NewTransaction::from)
        .collect();

    let count = {
        let mut connection = lock_connection(&state.db_connection)?;

        replace_all_transactions(&transactions, &mut connection)
            .inspect_err(|error| tracing::error!("Could not import the product feed: {error}"))?
    };

    tracing::info!("Seeded the database with {count} transactions");

    Ok(Json(SeedResponse {
        message: "Database initialized with seed data!".to_owned(),
        count,
    }))
}
