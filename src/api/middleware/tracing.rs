//! HTTP request/response tracing middleware.

use axum::http::{Request, header};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

use super::request_id::REQUEST_ID_HEADER;

/// Span factory that records the request host and id next to method and URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewaySpan;

impl<B> MakeSpan<B> for GatewaySpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let host = request
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        let request_id = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            host = %host,
            uri = %request.uri(),
            version = ?request.version(),
        )
    }
}

/// Creates a tracing middleware for HTTP requests.
///
/// # Example Logs
///
/// ```text
/// INFO request{request_id=0b6c3a5e-... method=GET host=go.example.com uri=/ version=HTTP/1.1}: finished processing request latency=12 ms status=307
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, GatewaySpan> {
    TraceLayer::new_for_http()
        .make_span_with(GatewaySpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
