//! Welcome endpoint.

use axum::Json;
use serde::Serialize;

pub const WELCOME_MESSAGE: &str = "Welcome to DevOps DevOps assignment API - Sagility";
pub const API_VERSION: &str = "1.0.0";

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

/// GET / — returns the static welcome payload.
pub async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
        version: API_VERSION,
        status: "healthy",
    })
}
