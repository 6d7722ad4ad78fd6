//! Request id propagation.
//!
//! Reuses an upstream `x-request-id` when it looks sane, otherwise mints a
//! UUID v4. The id is recorded on the tracing span, tagged on the Sentry scope,
//! stored in request extensions and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upstream ids longer than this are replaced.
const MAX_UPSTREAM_LEN: usize = 128;

/// Request id available to handlers through `Extension<RequestId>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Accept an upstream id only if it is short printable ASCII without spaces.
fn upstream_id(value: &HeaderValue) -> Option<String> {
    let s = value.to_str().ok()?;
    let valid = !s.is_empty()
        && s.len() <= MAX_UPSTREAM_LEN
        && s.bytes().all(|b| b.is_ascii_graphic());
    valid.then(|| s.to_string())
}

/// Attach a request id to every request and response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(upstream_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_id_accepted() {
        let value = HeaderValue::from_static("cf-8a1b2c3d");
        assert_eq!(upstream_id(&value).as_deref(), Some("cf-8a1b2c3d"));
    }

    #[test]
    fn test_upstream_id_rejected() {
        assert!(upstream_id(&HeaderValue::from_static("")).is_none());
        assert!(upstream_id(&HeaderValue::from_static("has space")).is_none());

        let long = HeaderValue::from_str(&"a".repeat(MAX_UPSTREAM_LEN + 1)).unwrap();
        assert!(upstream_id(&long).is_none());
    }
}
