//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a body to include in the `info` level logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request line and the response for each request.
///
/// The request line and the response status are logged at the `info` level
/// along with the first [LOG_BODY_LENGTH_LIMIT] bytes of the response body.
/// Longer bodies are also logged in full at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::info!("Received request: {method} {uri}");

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read the response body for {method} {uri}: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(parts.status, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn log_response(status: StatusCode, body: &Bytes) {
    let body_text = String::from_utf8_lossy(body);

    if body_text.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {status}\nbody: {}...",
            truncate(&body_text, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body_text:?}");
    } else {
        tracing::info!("Sending response: {status}\nbody: {body_text:?}");
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a
/// character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    let end = text
        .char_indices()
        .map(|(index, c)| index + c.len_utf8())
        .take_while(|&end| end <= limit)
        .last()
        .unwrap_or(0);

    &text[..end]
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware, routing::get};
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, truncate};

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("hello", 10), "hello");
        // 'é' is two bytes, so cutting at 2 bytes would split it.
        assert_eq!(truncate("aé", 2), "a");
        assert_eq!(truncate("", LOG_BODY_LENGTH_LIMIT), "");
    }

    #[tokio::test]
    async fn passes_long_response_through_unchanged() {
        let long_body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 4);
        let expected = long_body.clone();
        let app = Router::new()
            .route("/", get(move || async move { long_body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get("/").await;

        response.assert_status_ok();
        assert_eq!(response.text(), expected);
    }
}
