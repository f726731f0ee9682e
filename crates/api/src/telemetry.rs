use std::time::Duration;

use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::trace::HttpMakeClassifier;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

/// Largest accepted request body. Department snapshots with a few hundred
/// subjects stay well below this.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

type Layers = Stack<
    TimeoutLayer,
    Stack<RequestBodyLimitLayer, Stack<CorsLayer, Stack<TraceLayer<HttpMakeClassifier>, Identity>>>,
>;

/// Middleware shared by every route: tracing, CORS, body limit, timeout.
pub fn stack(request_timeout: Duration) -> ServiceBuilder<Layers> {
    ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TimeoutLayer::new(request_timeout))
}
