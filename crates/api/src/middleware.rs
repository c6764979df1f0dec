//! Request counting middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use telemetry::MetricsRegistry;

use crate::AppState;

/// Counter incremented once for every completed request.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Status recorded when a request is dropped before a response was produced.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Registers the counters this middleware records into.
pub fn register_metrics(registry: &MetricsRegistry) -> telemetry::Result<()> {
    registry.register_counter(
        HTTP_REQUESTS_TOTAL,
        "Total number of HTTP requests",
        &["method", "route", "status"],
    )
}

/// Records a single request in `http_requests_total` when dropped.
///
/// The guard is armed when the request arrives and counts exactly once:
/// with the response status if [`complete`](Self::complete) was called,
/// otherwise with [`CLIENT_CLOSED_REQUEST`] because the request future was
/// dropped before the handler chain finished.
pub struct RequestGuard {
    registry: Arc<MetricsRegistry>,
    method: Method,
    route: String,
    status: Option<StatusCode>,
}

impl RequestGuard {
    pub fn arm(registry: Arc<MetricsRegistry>, method: Method, route: impl Into<String>) -> Self {
        Self {
            registry,
            method,
            route: route.into(),
            status: None,
        }
    }

    /// Consumes the guard, counting the request with `status`.
    pub fn complete(mut self, status: StatusCode) {
        self.status = Some(status);
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        let status = self
            .status
            .map_or(CLIENT_CLOSED_REQUEST, |status| status.as_u16())
            .to_string();

        if let Err(err) = self.registry.increment(
            HTTP_REQUESTS_TOTAL,
            &[
                ("method", self.method.as_str()),
                ("route", self.route.as_str()),
                ("status", status.as_str()),
            ],
        ) {
            tracing::warn!(error = %err, route = %self.route, "failed to count request");
        }
    }
}

/// Counts every request by method, path and response status.
pub async fn count_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let guard = RequestGuard::arm(
        state.registry.clone(),
        request.method().clone(),
        request.uri().path(),
    );

    let response = next.run(request).await;
    guard.complete(response.status());
    response
}
