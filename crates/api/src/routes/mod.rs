//! Route handlers.

pub mod health;
pub mod metrics;
pub mod welcome;

use axum::http::{Method, Uri};

use crate::error::ApiError;

/// Fallback for requests that match no route.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Cannot {method} {}", uri.path()))
}
