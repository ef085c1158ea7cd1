use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Returns a welcome message.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Interviewer API" }))
}

/// GET /health
/// Health check endpoint for monitoring and load balancers.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interviewer-api"
    }))
}
