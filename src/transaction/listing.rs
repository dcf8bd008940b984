//! The paginated, searchable listing of a month's transactions.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::{Deserialize, Serialize};

use crate::Error;

use super::{
    core::{TRANSACTION_COLUMNS, TransactionRecord, map_transaction_row},
    filter::{month_filter, search_filter},
    month::MonthFilter,
};

/// A validated request for one page of a month's transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    /// The month to list transactions for.
    pub month: MonthFilter,
    /// Text to search titles, descriptions and prices for. Empty matches everything.
    pub search: String,
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of transactions per page. Must be at least 1.
    pub per_page: u64,
}

/// One page of transactions along with the totals needed to page through the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// The transactions on this page, ordered by ID.
    pub transactions: Vec<TransactionRecord>,
    /// The number of matching transactions across all pages.
    pub total: u64,
    /// The 1-based page number.
    pub page: u64,
    /// The number of pages, `ceil(total / per_page)`.
    pub pages: u64,
    /// The maximum number of transactions per page.
    pub per_page: u64,
}

/// Get one page of the transactions that match `query`.
///
/// Pages past the last page are empty rather than an error.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub fn list_transactions(
    query: &ListingQuery,
    connection: &Connection,
) -> Result<TransactionPage, Error> {
    let filter = match search_filter(&query.search) {
        Some(search) => month_filter(&query.month).and(search),
        None => month_filter(&query.month),
    };

    let total: i64 = connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM \"transaction\" WHERE {}",
            filter.clause
        ))?
        .query_row(params_from_iter(filter.params.iter()), |row| row.get(0))?;
    let total = u64::try_from(total).unwrap_or_default();

    let offset = query.page.saturating_sub(1).saturating_mul(query.per_page);
    let mut params = filter.params;
    params.push(to_sql_integer(query.per_page));
    params.push(to_sql_integer(offset));

    // Order by ID so that walking the pages visits every match exactly once.
    let transactions = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" \
            WHERE {} ORDER BY id ASC LIMIT ? OFFSET ?",
            filter.clause
        ))?
        .query_map(params_from_iter(params.iter()), map_transaction_row)?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    Ok(TransactionPage {
        transactions,
        total,
        page: query.page,
        pages: total.div_ceil(query.per_page.max(1)),
        per_page: query.per_page,
    })
}

fn to_sql_integer(value: u64) -> Value {
    Value::Integer(i64::try_from(value).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rusqlite::Connection;
    use time::{Month, OffsetDateTime, macros::datetime};

    use crate::{
        test_utils::get_test_connection,
        transaction::{MonthFilter, MonthRange, TransactionRecord, create_transaction},
    };

    use super::{ListingQuery, list_transactions};

    fn march_2024() -> MonthFilter {
        MonthFilter::Range(MonthRange::new(3, 2024).unwrap())
    }

    fn query(search: &str, page: u64, per_page: u64) -> ListingQuery {
        ListingQuery {
            month: march_2024(),
            search: search.to_owned(),
            page,
            per_page,
        }
    }

    fn create_march_transactions(count: usize, conn: &Connection) {
        for i in 0..count {
            create_transaction(
                TransactionRecord::build(
                    &format!("Product #{i}"),
                    (i * 10) as f64,
                    datetime!(2024-03-01 12:00 UTC) + time::Duration::days((i % 31) as i64),
                ),
                conn,
            )
            .unwrap();
        }
    }

    #[test]
    fn first_page_is_capped_at_page_size() {
        let conn = get_test_connection();
        create_march_transactions(25, &conn);

        let page = list_transactions(&query("", 1, 10), &conn).unwrap();

        assert_eq!(page.transactions.len(), 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 3);
        assert_eq!(page.per_page, 10);
        assert_eq!(page.transactions[0].id, 1);
    }

    #[test]
    fn walking_all_pages_visits_every_match_once() {
        let conn = get_test_connection();
        create_march_transactions(23, &conn);

        for per_page in [1, 4, 10, 23, 50] {
            let first_page = list_transactions(&query("", 1, per_page), &conn).unwrap();
            assert_eq!(first_page.pages, first_page.total.div_ceil(per_page));

            let mut seen = HashSet::new();
            for page_number in 1..=first_page.pages {
                let page = list_transactions(&query("", page_number, per_page), &conn).unwrap();
                for transaction in page.transactions {
                    assert!(seen.insert(transaction.id), "saw {} twice", transaction.id);
                }
            }

            assert_eq!(seen.len() as u64, first_page.total, "per_page {per_page}");
        }
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let conn = get_test_connection();
        create_march_transactions(5, &conn);

        let page = list_transactions(&query("", 7, 10), &conn).unwrap();

        assert!(page.transactions.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 1);
        assert_eq!(page.page, 7);
    }

    #[test]
    fn no_matches_has_zero_pages() {
        let conn = get_test_connection();

        let page = list_transactions(&query("", 1, 10), &conn).unwrap();

        assert!(page.transactions.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn excludes_other_months() {
        let conn = get_test_connection();
        create_march_transactions(3, &conn);
        create_transaction(
            TransactionRecord::build("April", 1.0, datetime!(2024-04-01 0:00 UTC)),
            &conn,
        )
        .unwrap();
        create_transaction(
            TransactionRecord::build("Last March", 1.0, datetime!(2023-03-15 0:00 UTC)),
            &conn,
        )
        .unwrap();

        let page = list_transactions(&query("", 1, 10), &conn).unwrap();

        assert_eq!(page.total, 3);
        assert!(
            page.transactions
                .iter()
                .all(|transaction| transaction.date_of_sale.month() == Month::March
                    && transaction.date_of_sale.year() == 2024)
        );
    }

    #[test]
    fn search_counts_only_matches() {
        let conn = get_test_connection();
        create_march_transactions(12, &conn);

        // Titles "Product #1", "Product #10" and "Product #11" contain "#1".
        let page = list_transactions(&query("#1", 1, 2), &conn).unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        assert_eq!(page.transactions.len(), 2);
    }

    #[test]
    fn any_year_lists_the_month_from_every_year() {
        let conn = get_test_connection();
        for year in [2021, 2022, 2023] {
            let date_of_sale = OffsetDateTime::new_utc(
                time::Date::from_calendar_date(year, Month::March, 10).unwrap(),
                time::Time::MIDNIGHT,
            );
            create_transaction(TransactionRecord::build("", 1.0, date_of_sale), &conn).unwrap();
        }

        let page = list_transactions(
            &ListingQuery {
                month: MonthFilter::AnyYear(Month::March),
                search: String::new(),
                page: 1,
                per_page: 10,
            },
            &conn,
        )
        .unwrap();

        assert_eq!(page.total, 3);
    }
}
