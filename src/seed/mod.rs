//! Replaces the stored transactions with the product feed.
//!
//! The feed is a JSON array of products fetched over HTTP (or read from a file
//! by the `seed_db` binary). Importing clears the store and inserts the feed in
//! a single database transaction.

mod endpoint;
mod feed;

pub use endpoint::{SeedResponse, SeedState, seed_endpoint};
pub use feed::{DEFAULT_SEED_URL, FeedRecord, fetch_feed, parse_feed};
