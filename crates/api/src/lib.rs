//! Demo HTTP API with health checks and Prometheus request metrics.
//!
//! Serves a welcome payload, a health check and the metrics exposition.
//! Every request is counted by [`middleware::count_requests`] once its
//! response is ready.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use telemetry::MetricsRegistry;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Shared application state accessible from the middleware and all handlers.
///
/// Uptime is read from the registry so `/health` and
/// `process_uptime_seconds` share one start instant.
#[derive(Debug)]
pub struct AppState {
    pub registry: Arc<MetricsRegistry>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/", get(routes::welcome::index))
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .fallback(routes::not_found);

    with_layers(router, state)
}

/// Wraps `router` in the request counter, panic catcher and tracing.
///
/// The counter sits outside the panic catcher so a panicking handler is
/// still recorded, with status 500.
pub(crate) fn with_layers(router: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    router
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::count_requests,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: a fresh registry with the request
/// counter registered.
pub fn create_default_state() -> telemetry::Result<Arc<AppState>> {
    let registry = MetricsRegistry::new();
    middleware::register_metrics(&registry)?;

    Ok(Arc::new(AppState {
        registry: Arc::new(registry),
    }))
}
