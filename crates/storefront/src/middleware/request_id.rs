//! Request ID middleware for request tracing and correlation.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensure every request carries a request ID and echo it on the response.
///
/// An upstream proxy's `x-request-id` is honored when present; otherwise a
/// fresh ID is minted. The ID is recorded on the current tracing span and
/// tagged onto the Sentry scope so log lines and error reports correlate.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = match request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        Some(upstream) => upstream.to_owned(),
        None => mint_request_id(),
    };

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// A fresh request ID: a UUID v4 without hyphens, compact enough for log
/// lines while still collision-safe.
fn mint_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_compact_and_unique() {
        let a = mint_request_id();
        let b = mint_request_id();
        assert_eq!(a.len(), 32);
        assert!(!a.contains('-'));
        assert_ne!(a, b);
    }
}
