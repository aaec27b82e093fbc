//! HTTP adapters - REST API implementations.
//!
//! Each area has its own HTTP adapter for endpoint exposure; [`app_router`]
//! stacks the cross-cutting layers on top.

pub mod decision;

use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use decision::{decision_routes, DecisionHandlers};

/// Options for the outer HTTP stack.
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    /// `None` disables the request timeout.
    pub request_timeout: Option<Duration>,
}

/// Full application router with tracing, CORS, timeout and panic recovery.
pub fn app_router(decision: DecisionHandlers, options: &HttpOptions) -> Router {
    let mut router = decision_routes(decision)
        .layer(cors_layer(options.cors_origins.as_deref()))
        .layer(TraceLayer::new_for_http());

    if let Some(timeout) = options.request_timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    router.layer(CatchPanicLayer::new())
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let Some(origins) = origins else {
        return base.allow_origin(Any);
    };

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(parsed)
}
