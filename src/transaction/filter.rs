//! SQL `WHERE` clauses shared by the monthly transaction queries.

use rusqlite::types::Value;

use crate::db::CASEFOLD_FUNCTION;

use super::month::MonthFilter;

/// A SQL boolean expression and the positional (`?`) parameters it binds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SqlFilter {
    pub clause: String,
    pub params: Vec<Value>,
}

impl SqlFilter {
    /// Combine `self` and `other` with `AND`.
    pub fn and(mut self, other: SqlFilter) -> SqlFilter {
        self.clause = format!("{} AND {}", self.clause, other.clause);
        self.params.extend(other.params);
        self
    }
}

/// Match transactions sold in the month described by `month`.
pub(crate) fn month_filter(month: &MonthFilter) -> SqlFilter {
    match month {
        MonthFilter::Range(range) => SqlFilter {
            clause: "sale_date BETWEEN ? AND ?".to_owned(),
            params: vec![
                Value::Text(range.start().to_string()),
                Value::Text(range.end().to_string()),
            ],
        },
        MonthFilter::AnyYear(month) => SqlFilter {
            clause: "CAST(strftime('%m', sale_date) AS INTEGER) = ?".to_owned(),
            params: vec![Value::Integer(u8::from(*month).into())],
        },
    }
}

/// Match transactions whose title, description or price contains `search`.
///
/// Title and description are matched case-insensitively, including non-ASCII
/// letters, by lowercasing both sides with the `casefold` SQL function
/// registered in [crate::db::initialize]. The price is matched against its
/// text form, e.g. a search for "9.8" matches a price of 329.85.
///
/// Returns `None` for an empty search, which matches everything.
pub(crate) fn search_filter(search: &str) -> Option<SqlFilter> {
    if search.is_empty() {
        return None;
    }

    let pattern = Value::Text(format!("%{}%", escape_like(search)));

    Some(SqlFilter {
        clause: format!(
            "({CASEFOLD_FUNCTION}(title) LIKE {CASEFOLD_FUNCTION}(?) ESCAPE '\\' \
            OR {CASEFOLD_FUNCTION}(description) LIKE {CASEFOLD_FUNCTION}(?) ESCAPE '\\' \
            OR CAST(price AS TEXT) LIKE ? ESCAPE '\\')"
        ),
        params: vec![pattern.clone(), pattern.clone(), pattern],
    })
}

/// Escape the `LIKE` wildcards in `text` so that it is matched literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
