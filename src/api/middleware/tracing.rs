//! Request spans and response logging.

use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Builds request spans keyed by the matched route template.
///
/// Spans carry both the concrete `uri` and the `route` it matched, so every
/// `/press-releases/{id}/view` hit groups under one route in log queries.
/// Requests that match no route (404s, static files) record only the uri.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSpan;

impl<B> MakeSpan<B> for RouteSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or_default();

        tracing::info_span!(
            "request",
            method = %request.method(),
            route,
            uri = %request.uri(),
        )
    }
}

/// Tracing middleware for every HTTP request.
///
/// ```text
/// INFO request{method=POST route=/api/press-releases/{id}/publish uri=/api/press-releases/abc/publish}: finished processing request latency=4 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RouteSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RouteSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
