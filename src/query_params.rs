//! Query string parameters, parsed once at the request boundary into typed values.
//!
//! The raw structs accept any string so that malformed values are reported
//! with the same JSON error as every other invalid parameter.

use serde::Deserialize;
use time::Month;

use crate::{Error, pagination::PaginationConfig};

/// The raw query string for the transaction listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQueryParams {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// The raw query string for the endpoints that only take a month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQueryParams {
    pub month: Option<String>,
}

/// Validated parameters for the transaction listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingParams {
    pub month: Month,
    pub search: String,
    pub page: u64,
    pub per_page: u64,
}

impl ListingParams {
    /// Parse the raw listing query, applying the defaults from `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidParameter] if `month` is missing or invalid, or
    /// if `page` or `perPage` are not valid page numbers/sizes.
    pub fn parse(raw: ListingQueryParams, config: &PaginationConfig) -> Result<Self, Error> {
        Ok(Self {
            month: parse_month(raw.month.as_deref())?,
            search: raw.search.unwrap_or_default(),
            page: parse_page(raw.page.as_deref(), config)?,
            per_page: parse_per_page(raw.per_page.as_deref(), config)?,
        })
    }
}

/// Validated parameters for the endpoints that only take a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthParams {
    pub month: Month,
}

impl MonthParams {
    /// # Errors
    /// Returns [Error::InvalidParameter] if `month` is missing or invalid.
    pub fn parse(raw: MonthQueryParams) -> Result<Self, Error> {
        Ok(Self {
            month: parse_month(raw.month.as_deref())?,
        })
    }
}

/// Treat empty values, e.g. `?page=`, the same as missing ones.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse a month number from 1 (January) to 12 (December).
///
/// # Errors
/// Returns [Error::InvalidParameter] if the month is missing, not a number, or
/// not between 1 and 12.
pub fn parse_month(value: Option<&str>) -> Result<Month, Error> {
    let value = non_empty(value)
        .ok_or_else(|| Error::InvalidParameter("month is required".to_owned()))?;

    value
        .parse::<u8>()
        .ok()
        .and_then(|number| Month::try_from(number).ok())
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "month must be a number between 1 and 12, got \"{value}\""
            ))
        })
}

/// Parse a 1-based page number, defaulting to the configured first page.
///
/// # Errors
/// Returns [Error::InvalidParameter] if the page is not a positive integer.
pub fn parse_page(value: Option<&str>, config: &PaginationConfig) -> Result<u64, Error> {
    let Some(value) = non_empty(value) else {
        return Ok(config.default_page);
    };

    value
        .parse::<u64>()
        .ok()
        .filter(|&page| page >= 1)
        .ok_or_else(|| {
            Error::InvalidParameter(format!("page must be a positive integer, got \"{value}\""))
        })
}

/// Parse the page size, defaulting to the configured page size.
///
/// # Errors
/// Returns [Error::InvalidParameter] if the page size is not an integer from 1
/// to the configured maximum.
pub fn parse_per_page(value: Option<&str>, config: &PaginationConfig) -> Result<u64, Error> {
    let Some(value) = non_empty(value) else {
        return Ok(config.default_page_size);
    };

    value
        .parse::<u64>()
        .ok()
        .filter(|per_page| (1..=config.max_page_size).contains(per_page))
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "perPage must be an integer between 1 and {}, got \"{value}\"",
                config.max_page_size
            ))
        })
}
