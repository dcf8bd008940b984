//! Defines the app level error type and conversions to JSON and HTML responses.
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::html::error_view;

/// The message sent to clients for errors that should only be described in the server logs.
const INTERNAL_ERROR_MESSAGE: &str =
    "An unexpected error occurred, check the server logs for more details.";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A request parameter was missing or could not be parsed.
    ///
    /// The string describes which parameter was invalid and why, and is safe
    /// to show to the client.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The record store could not be reached, e.g. the database lock is poisoned.
    #[error("the record store is unavailable: {0}")]
    StoreUnavailable(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The seed data could not be fetched or decoded.
    #[error("could not fetch the seed data: {0}")]
    UpstreamFetchFailure(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The page sizes the server was configured with cannot be used.
    #[error("invalid pagination config: {0}")]
    InvalidPaginationConfig(String),

    /// A background query task panicked or was cancelled.
    #[error("a query task failed: {0}")]
    TaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

/// The JSON body sent for every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// A description of what went wrong.
    pub message: String,
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamFetchFailure(_) => StatusCode::BAD_GATEWAY,
            Error::StoreUnavailable(_)
            | Error::SqlError(_)
            | Error::InvalidTimezone(_)
            | Error::InvalidPaginationConfig(_)
            | Error::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message to show the client.
    ///
    /// Internal errors get a generic message, the details are only logged.
    fn client_message(&self) -> String {
        match self {
            Error::InvalidParameter(_) | Error::UpstreamFetchFailure(_) => self.to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_owned(),
        }
    }

    fn log(&self) {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
    }

    /// Render the error as a full HTML error page.
    ///
    /// Used by the dashboard, the JSON routes use [IntoResponse].
    pub fn into_html_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let description = match status {
            StatusCode::BAD_REQUEST => "That request doesn't look right.",
            _ => "Sorry, something went wrong.",
        };

        let page = error_view(
            status.canonical_reason().unwrap_or("Error"),
            status.as_str(),
            description,
            &self.client_message(),
        );

        (status, Html(page.into_string())).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.log();

        let body = ErrorBody {
            message: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::test_utils::{assert_content_type, parse_json};

    use super::{Error, ErrorBody, INTERNAL_ERROR_MESSAGE};

    async fn parse_body(error: Error) -> (StatusCode, ErrorBody) {
        let response = error.into_response();
        let status = response.status();
        assert_content_type(&response, "application/json");

        (status, parse_json(response).await)
    }

    #[tokio::test]
    async fn invalid_parameter_is_a_bad_request() {
        let (status, body) = parse_body(Error::InvalidParameter("month is required".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "invalid parameter: month is required");
    }

    #[tokio::test]
    async fn store_errors_hide_details() {
        let (status, body) = parse_body(Error::StoreUnavailable("poisoned lock".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_bad_gateway() {
        let (status, body) = parse_body(Error::UpstreamFetchFailure("timed out".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.message.contains("timed out"));
    }

    #[test]
    fn html_response_keeps_status_code() {
        let response = Error::InvalidParameter("page must be at least 1".to_owned())
            .into_html_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_content_type(&response, "text/html; charset=utf-8");
    }
}
