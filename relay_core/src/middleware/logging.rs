//! Request logging middleware configuration

use axum::body::Body;
use http::{Request, Response};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier};
use tower_http::trace::{DefaultOnBodyChunk, DefaultOnEos, TraceLayer};
use tracing::{info_span, Span};

type MakeSpanFn = fn(&Request<Body>) -> Span;
type OnRequestFn = fn(&Request<Body>, &Span);
type OnResponseFn = fn(&Response<Body>, Duration, &Span);
type OnFailureFn = fn(ServerErrorsFailureClass, Duration, &Span);

pub type RequestTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeSpanFn,
    OnRequestFn,
    OnResponseFn,
    DefaultOnBodyChunk,
    DefaultOnEos,
    OnFailureFn,
>;

pub fn logging_layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_request_span as MakeSpanFn)
        .on_request(log_request as OnRequestFn)
        .on_response(log_response as OnResponseFn)
        .on_failure(log_failure as OnFailureFn)
}

fn make_request_span(request: &Request<Body>) -> Span {
    let origin = request
        .headers()
        .get(http::header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        origin = %origin,
    )
}

fn log_request(request: &Request<Body>, _span: &Span) {
    tracing::info!(
        "started processing request {} {}",
        request.method(),
        request.uri().path()
    );
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status();
    let latency_ms = latency.as_millis();

    if status.is_success() {
        tracing::info!(status = status.as_u16(), latency_ms = latency_ms, "request completed successfully");
    } else if status.is_client_error() {
        tracing::warn!(status = status.as_u16(), latency_ms = latency_ms, "client error response");
    } else {
        tracing::error!(status = status.as_u16(), latency_ms = latency_ms, "server error response");
    }
}

fn log_failure(error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    tracing::error!(latency_ms = latency.as_millis(), error = ?error, "request failed");
}
