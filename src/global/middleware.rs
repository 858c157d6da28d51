use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::{field::Empty, info, warn, Instrument};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Interpretation requests spend most of their time waiting on model calls,
/// so a request past this point deserves a warning even when it succeeds.
const SLOW_REQUEST_MS: u64 = 10_000;

/// Tags every request with an id (honoring an incoming `x-request-id`),
/// opens the span all domain logs inherit, and records the outcome.
pub async fn request_trace_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        status = Empty,
    );

    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        tracing::Span::current().record("status", response.status().as_u16());

        let duration_ms = start.elapsed().as_millis() as u64;
        if duration_ms >= SLOW_REQUEST_MS {
            warn!(duration_ms, "slow request");
        } else {
            info!(duration_ms, "request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
