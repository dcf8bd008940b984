use serde::Deserialize;
use time::OffsetDateTime;

use crate::{Error, NewTransaction};

/// The product feed the store is seeded from by default.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// One product in the seed feed.
///
/// Feed IDs and images are ignored, the store assigns its own IDs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    /// The name of the product.
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the product sold. Older feeds call this `isSold`.
    #[serde(alias = "isSold", default)]
    pub sold: bool,
    /// An RFC 3339 timestamp, e.g. "2021-11-27T20:29:54+05:30".
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl From<FeedRecord> for NewTransaction {
    fn from(record: FeedRecord) -> Self {
        NewTransaction {
            title: record.title,
            description: record.description,
            price: record.price,
            date_of_sale: record.date_of_sale,
            category: record.category,
            is_sold: record.sold,
        }
    }
}

/// Parse the JSON text of a product feed.
///
/// # Errors
/// Returns [Error::UpstreamFetchFailure] if the text is not a valid feed.
pub fn parse_feed(text: &str) -> Result<Vec<FeedRecord>, Error> {
    serde_json::from_str(text).map_err(|error| {
        tracing::error!("Could not parse the product feed: {error}");
        Error::UpstreamFetchFailure(format!("invalid feed: {error}"))
    })
}

/// Download and parse the product feed at `url`.
///
/// # Errors
/// Returns [Error::UpstreamFetchFailure] if the request fails, the server
/// responds with an error status, or the body is not a valid feed.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<Vec<FeedRecord>, Error> {
    tracing::info!("Fetching product feed from {url}");

    let upstream_error = |error: reqwest::Error| {
        tracing::error!("Could not fetch the product feed from {url}: {error}");
        Error::UpstreamFetchFailure(error.to_string())
    };

    let text = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(upstream_error)?
        .text()
        .await
        .map_err(upstream_error)?;

    parse_feed(&text)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use time::macros::datetime;

    use crate::{
        Error, NewTransaction,
        test_utils::{FEED, serve_feed},
    };

    use super::{FeedRecord, fetch_feed, parse_feed};

    #[test]
    fn parses_both_sold_field_names() {
        let records = parse_feed(FEED).unwrap();

        assert_eq!(records.len(), 2);
        assert!(!records[0].sold);
        assert!(records[1].sold);
        assert_eq!(records[0].date_of_sale, datetime!(2021-11-27 20:29:54 +05:30));
    }

    #[test]
    fn converts_to_new_transaction() {
        let record = parse_feed(FEED).unwrap().remove(1);

        let transaction = NewTransaction::from(record);

        assert_eq!(transaction.title, "Mens Casual Premium Slim Fit T-Shirts");
        assert_eq!(transaction.price, 44.6);
        assert_eq!(transaction.category.as_deref(), Some("men's clothing"));
        assert!(transaction.is_sold);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let records = parse_feed(
            r#"[{"title": "Ring", "price": 9.99, "dateOfSale": "2022-03-01T00:00:00Z"}]"#,
        )
        .unwrap();

        assert_eq!(
            records,
            [FeedRecord {
                title: "Ring".to_owned(),
                description: String::new(),
                price: 9.99,
                category: None,
                sold: false,
                date_of_sale: datetime!(2022-03-01 0:00 UTC),
            }]
        );
    }

    #[test]
    fn rejects_invalid_feed() {
        let result = parse_feed(r#"{"not": "a list"}"#);

        assert!(matches!(result, Err(Error::UpstreamFetchFailure(_))));
    }

    #[tokio::test]
    async fn fetches_feed_over_http() {
        let url = serve_feed(StatusCode::OK, FEED).await;

        let records = fetch_feed(&reqwest::Client::new(), &url).await.unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn error_status_is_an_upstream_failure() {
        let url = serve_feed(StatusCode::INTERNAL_SERVER_ERROR, "oops").await;

        let result = fetch_feed(&reqwest::Client::new(), &url).await;

        assert!(matches!(result, Err(Error::UpstreamFetchFailure(_))), "got {result:?}");
    }
}
