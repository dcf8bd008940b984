//! The response for unknown routes.

use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::{endpoints, error::ErrorBody, html::error_view};

/// Respond with a 404: JSON for API routes and an HTML page for everything else.
pub async fn get_404_not_found(uri: Uri) -> Response {
    tracing::debug!("No route for {uri}");

    if uri.path().starts_with(endpoints::API_PREFIX) {
        let body = ErrorBody {
            message: "not found".to_owned(),
        };

        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }

    let page = error_view(
        "Not Found",
        "404",
        "Something's missing.",
        "Sorry, we can't find that page.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
